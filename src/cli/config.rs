//! TOML configuration file support.
//!
//! Lab-wide defaults can live in a config file instead of being typed at the
//! prompts on every run:
//!
//! ```toml
//! # mga-assay.toml
//! [calculation]
//! standard_concentration = 1000.0
//! recovery = true
//! expected_potency = 2000.0
//! average = "positional"
//! rsd_threshold_percent = 10.0
//!
//! [report]
//! output_dir = "reports"
//!
//! [vocabulary]
//! primary_analyte = "Melengestrol"
//! internal_analyte = "Megestrol"
//!
//! [vocabulary.headers]
//! ignored = ["Injection Volume"]
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use mga_assay::{PairingMode, Vocabulary};

/// Duplicate averaging choice as written in config files and on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AverageSetting {
    /// Do not average duplicate injections
    Off,
    /// Pair consecutive unknowns in file order
    Positional,
    /// Pair unknowns whose names differ only in the injection number
    ByName,
}

impl AverageSetting {
    pub fn pairing(self) -> Option<PairingMode> {
        match self {
            AverageSetting::Off => None,
            AverageSetting::Positional => Some(PairingMode::Positional),
            AverageSetting::ByName => Some(PairingMode::ByName),
        }
    }
}

/// Root configuration structure for mga-assay.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Header keywords, analyte names and sample-type markers.
    #[serde(default)]
    pub vocabulary: Vocabulary,

    /// Calculation inputs.
    #[serde(default)]
    pub calculation: CalculationConfig,

    /// Output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Calculation inputs that would otherwise be prompted for.
#[derive(Debug, Default, Deserialize)]
pub struct CalculationConfig {
    /// Standard concentration in ppb.
    pub standard_concentration: Option<f64>,

    /// Whether to compute recoveries.
    pub recovery: Option<bool>,

    /// Expected sample potency in ppb (implies `recovery = true`).
    pub expected_potency: Option<f64>,

    /// Duplicate averaging mode.
    pub average: Option<AverageSetting>,

    /// Weight in grams for unknowns when the export has no weight column.
    pub default_weight: Option<f64>,

    /// Dilution for unknowns when the export has no dilution column.
    pub default_dilution: Option<f64>,

    /// RSD acceptance limit in percent.
    pub rsd_threshold_percent: Option<f64>,

    /// Abort on any per-sample calculation failure.
    pub strict: Option<bool>,
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// Directory for generated workbooks (defaults to the input's directory).
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
