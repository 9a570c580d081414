use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

mod config;
mod process;
mod prompt;

pub use config::{AverageSetting, Config};
pub use process::{RecoveryChoice, RunOptions, RunStatus};

/// MGA Feed Assay Processor - chromatography export to assay report
#[derive(Parser, Debug)]
#[command(name = "mga-assay")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Tab-delimited export file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Standard concentration in ppb
    #[arg(long, value_name = "PPB")]
    standard_conc: Option<f64>,

    /// Expected sample potency in ppb (enables recoveries)
    #[arg(long, value_name = "PPB", conflicts_with = "no_recovery")]
    expected_potency: Option<f64>,

    /// Do not calculate recoveries
    #[arg(long)]
    no_recovery: bool,

    /// Average duplicate injections
    #[arg(long, value_enum, value_name = "MODE")]
    average: Option<AverageSetting>,

    /// Weight in grams for unknowns when the export has no weight column
    #[arg(long, value_name = "GRAMS")]
    default_weight: Option<f64>,

    /// Dilution for unknowns when the export has no dilution column
    #[arg(long, value_name = "FACTOR")]
    default_dilution: Option<f64>,

    /// Directory for the generated workbook (defaults to the input's directory)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Also write the processed results as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// RSD acceptance limit in percent
    #[arg(long, value_name = "PERCENT")]
    rsd_threshold: Option<f64>,

    /// Abort when any sample cannot be calculated
    #[arg(long)]
    strict: bool,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Merge command-line flags over configuration file values
    pub fn into_options(self, config: Config) -> RunOptions {
        let calculation = config.calculation;

        let recovery = if self.no_recovery {
            RecoveryChoice::Skip
        } else if let Some(potency) = self.expected_potency {
            RecoveryChoice::Expected(potency)
        } else {
            match (calculation.recovery, calculation.expected_potency) {
                (Some(false), _) => RecoveryChoice::Skip,
                (_, Some(potency)) => RecoveryChoice::Expected(potency),
                _ => RecoveryChoice::Ask,
            }
        };

        let rsd_threshold_percent = self
            .rsd_threshold
            .or(calculation.rsd_threshold_percent)
            .unwrap_or(mga_assay::calibration::DEFAULT_RSD_THRESHOLD * 100.0);

        RunOptions {
            input: self.input,
            vocabulary: config.vocabulary,
            standard_concentration: self.standard_conc.or(calculation.standard_concentration),
            recovery,
            average: self.average.or(calculation.average),
            default_weight: self.default_weight.or(calculation.default_weight),
            default_dilution: self.default_dilution.or(calculation.default_dilution),
            output_dir: self.output.or(config.report.output_dir),
            json: self.json,
            rsd_threshold: rsd_threshold_percent / 100.0,
            strict: self.strict || calculation.strict.unwrap_or(false),
        }
    }
}

/// Parse the command line.
///
/// Help, version and usage errors all exit with status 1.
pub fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand {
                println!("Error: no data file entered - showing help.");
                let _ = Cli::command().print_help();
            } else {
                let _ = err.print();
            }
            std::process::exit(1);
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let options = cli.into_options(config);

    let stdin = std::io::stdin();
    let status = process::run(&options, stdin.lock(), std::io::stdout())?;
    if let RunStatus::Cancelled = status {
        println!("Exiting without a report.");
    }
    Ok(())
}
