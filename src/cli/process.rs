use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use mga_assay::assay::{
    calculate_assays, check_positive, pair_duplicates, AssayParameters, SampleInputs,
};
use mga_assay::calibration::calibrate;
use mga_assay::report::{
    output_path, percent_label, write_workbook, AssayReport, DuplicateSection,
};
use mga_assay::{PairingMode, RecordParser, Vocabulary};

use super::config::AverageSetting;
use super::prompt::{InputCollector, Step};

/// How recoveries are decided for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryChoice {
    /// Ask the operator
    Ask,
    /// No recoveries
    Skip,
    /// Recoveries against this expected potency (ppb)
    Expected(f64),
}

/// Fully merged settings for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub vocabulary: Vocabulary,
    pub standard_concentration: Option<f64>,
    pub recovery: RecoveryChoice,
    pub average: Option<AverageSetting>,
    pub default_weight: Option<f64>,
    pub default_dilution: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// RSD acceptance limit as a fraction
    pub rsd_threshold: f64,
    pub strict: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Report written to the given path
    Completed(PathBuf),
    /// Operator left a menu without choosing
    Cancelled,
}

/// Reject unusable concentration or potency settings before any prompt
fn check_preset_parameters(options: &RunOptions) -> Result<()> {
    if let Some(concentration) = options.standard_concentration {
        check_positive("standard concentration", concentration)?;
    }
    if let RecoveryChoice::Expected(potency) = options.recovery {
        check_positive("expected potency", potency)?;
    }
    Ok(())
}

/// Process one export: parse, calibrate, collect inputs, calculate, report.
pub fn run<R: BufRead, W: Write>(options: &RunOptions, input: R, output: W) -> Result<RunStatus> {
    let path = &options.input;
    if !path.exists() {
        bail!("Input file does not exist: {}", path.display());
    }
    check_preset_parameters(options)?;

    info!("MGA Feed Assay Processor v{}", mga_assay::VERSION);
    info!("===============================");
    info!("Input: {}", path.display());

    let mut run = RecordParser::new(options.vocabulary.clone())
        .parse_file(path)
        .with_context(|| format!("Failed to read export {}", path.display()))?;
    info!(
        "Parsed {} data rows into {} samples ({} standards, {} unknowns)",
        run.data_rows,
        run.injections.len(),
        run.injections.standard_count(),
        run.injections.unknown_count()
    );

    for issue in run.injections.compute_peak_ratios() {
        warn!("{}", issue);
    }
    for sample in &run.injections {
        debug!(
            "{} [{}] {} / {} -> ratio {:?}",
            sample.name, sample.sample_type, sample.primary_area, sample.internal_area, sample.peak_ratio
        );
    }

    let calibration = calibrate(&run.injections).context("Calibration failed")?;
    info!("Calibration: {}", calibration);
    if !calibration.passes(options.rsd_threshold) {
        warn!(
            "Standard RSD {:.2}% exceeds the {}% limit",
            calibration.rsd_percent(),
            percent_label(options.rsd_threshold)
        );
    }

    let mut collector = InputCollector::new(input, output);

    let mut inputs = SampleInputs::new();
    if !run.columns.has_weight() {
        match options.default_weight {
            Some(weight) => inputs.default_weight = Some(weight),
            None => {
                if collector.weights(&run.injections, &mut inputs)? == Step::Exit {
                    return Ok(RunStatus::Cancelled);
                }
            }
        }
    }
    if !run.columns.has_dilution() {
        match options.default_dilution {
            Some(dilution) => inputs.default_dilution = Some(dilution),
            None => {
                if collector.dilutions(&run.injections, &mut inputs)? == Step::Exit {
                    return Ok(RunStatus::Cancelled);
                }
            }
        }
    }
    inputs.apply(&mut run.injections);

    let standard_concentration = match options.standard_concentration {
        Some(value) => value,
        None => collector.standard_concentration()?,
    };
    let mut params = AssayParameters::new(standard_concentration);
    let expected_potency = match options.recovery {
        RecoveryChoice::Ask => collector.recovery()?,
        RecoveryChoice::Skip => None,
        RecoveryChoice::Expected(potency) => Some(potency),
    };
    if let Some(potency) = expected_potency {
        params = params.with_recovery(potency);
    }

    let pairing: Option<PairingMode> = match options.average {
        Some(setting) => setting.pairing(),
        None => collector.averaging(PairingMode::default())?,
    };

    let outcome = calculate_assays(&mut run.injections, &calibration, &params)
        .context("Invalid calculation parameters")?;
    info!(
        "Calculated {} of {} unknowns",
        outcome.computed,
        run.injections.unknown_count()
    );
    if options.strict {
        if let Some(first) = outcome.failures.first() {
            bail!(
                "{} sample(s) could not be calculated (strict mode); first: {}",
                outcome.failures.len(),
                first
            );
        }
    }

    let mut report = AssayReport::new(
        path.display().to_string(),
        run.injections,
        calibration,
        params,
    )
    .with_rsd_threshold(options.rsd_threshold)
    .with_failures(&outcome.failures);
    if let Some(mode) = pairing {
        let groups = pair_duplicates(&report.injections, mode);
        info!("Averaged {} duplicate groups ({})", groups.len(), mode);
        report = report.with_duplicates(DuplicateSection { mode, groups });
    }

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    let report_path = output_path(
        path,
        options.output_dir.as_deref(),
        report.generated_at.date_naive(),
    );
    let started = Instant::now();
    write_workbook(&report, &report_path)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    debug!("Workbook written in {:?}", started.elapsed());
    println!("Report written to {}", report_path.display());

    if let Some(json_path) = &options.json {
        report
            .write_json(json_path)
            .with_context(|| format!("Failed to write JSON to {}", json_path.display()))?;
        info!("JSON written to {}", json_path.display());
    }

    Ok(RunStatus::Completed(report_path))
}
