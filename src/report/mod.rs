//! # Report Exporter
//!
//! Renders a processed run for the operator:
//!
//! - a spreadsheet workbook ([`write_workbook`]) with the standards table,
//!   calibration summary and per-sample results,
//! - a terminal summary (the [`fmt::Display`] impl of [`AssayReport`], or
//!   [`AssayReport::format_colored`]),
//! - an optional JSON dump ([`AssayReport::write_json`]).
//!
//! Nothing here performs calculations; the report is assembled from results
//! the calibration and assay passes have already produced.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::assay::{AssayError, AssayParameters, DuplicateGroup, PairingMode};
use crate::calibration::CalibrationStats;
use crate::injection::{Injection, InjectionSet};

mod error;
mod naming;
mod summary;
mod workbook;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use naming::{output_file_name, output_path};
pub use workbook::{build_workbook, unknown_headers, write_workbook};

/// Duplicate averaging section of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateSection {
    /// How duplicates were grouped
    pub mode: PairingMode,
    /// Averaged groups in file order
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateSection {
    /// Group whose average is reported on the row of `sample`
    pub fn group_ending_at(&self, sample: &str) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.last_member() == Some(sample))
    }
}

/// Everything needed to render the results of one run
#[derive(Debug, Clone, Serialize)]
pub struct AssayReport {
    /// Input file the results came from
    pub source: String,

    /// When the report was generated
    pub generated_at: DateTime<Local>,

    /// All parsed injections with computed results
    pub injections: InjectionSet,

    /// Calibration statistics from the standards
    pub calibration: CalibrationStats,

    /// Parameters the assay was computed with
    pub parameters: AssayParameters,

    /// RSD acceptance limit as a fraction
    pub rsd_threshold: f64,

    /// Duplicate averages, when requested
    pub duplicates: Option<DuplicateSection>,

    /// Per-sample calculation failures
    pub failures: Vec<String>,
}

impl AssayReport {
    pub fn new(
        source: impl Into<String>,
        injections: InjectionSet,
        calibration: CalibrationStats,
        parameters: AssayParameters,
    ) -> Self {
        Self {
            source: source.into(),
            generated_at: Local::now(),
            injections,
            calibration,
            parameters,
            rsd_threshold: crate::calibration::DEFAULT_RSD_THRESHOLD,
            duplicates: None,
            failures: Vec::new(),
        }
    }

    pub fn with_rsd_threshold(mut self, threshold: f64) -> Self {
        self.rsd_threshold = threshold;
        self
    }

    pub fn with_duplicates(mut self, section: DuplicateSection) -> Self {
        self.duplicates = Some(section);
        self
    }

    /// Record per-sample failures from the assay pass
    pub fn with_failures(mut self, failures: &[AssayError]) -> Self {
        self.failures = failures.iter().map(ToString::to_string).collect();
        self
    }

    /// Whether the calibration RSD is within the acceptance limit
    pub fn calibration_passed(&self) -> bool {
        self.calibration.passes(self.rsd_threshold)
    }

    /// Acceptance limit in percent, e.g. `"10"` or `"7.5"`
    pub fn rsd_limit_label(&self) -> String {
        percent_label(self.rsd_threshold)
    }

    pub fn standards(&self) -> impl Iterator<Item = &Injection> {
        self.injections.standards()
    }

    pub fn unknowns(&self) -> impl Iterator<Item = &Injection> {
        self.injections.unknowns()
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON form of the report to `path`
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Render a fraction as a percentage with at most two decimals and no
/// trailing zeros (`0.07` gives `"7"`, `0.125` gives `"12.5"`)
pub fn percent_label(fraction: f64) -> String {
    let text = format!("{:.2}", fraction * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
