//! # Calibration Engine
//!
//! Builds single-point calibration statistics from the standard injections
//! of a run: mean peak ratio, sample standard deviation (n - 1 denominator)
//! and relative standard deviation.
//!
//! RSD is kept as a fraction. Rendering it as a percentage is left to the
//! report layer ([`CalibrationStats::rsd_percent`] is provided for that).

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::injection::InjectionSet;

mod error;


pub use error::CalibrationError;

/// Default RSD acceptance limit (10 %)
pub const DEFAULT_RSD_THRESHOLD: f64 = 0.10;

/// Summary statistics over the standard injections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStats {
    /// Number of standard injections used
    pub count: usize,

    /// Mean peak ratio
    pub mean: f64,

    /// Sample standard deviation of the peak ratios
    pub stdev: f64,

    /// `stdev / mean`
    pub rsd: f64,
}

impl CalibrationStats {
    /// RSD expressed as a percentage
    pub fn rsd_percent(&self) -> f64 {
        self.rsd * 100.0
    }

    /// Whether the RSD is within `threshold` (a fraction, e.g. 0.10)
    pub fn passes(&self, threshold: f64) -> bool {
        self.rsd <= threshold
    }
}

impl fmt::Display for CalibrationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} standards, mean peak ratio {:.4}, stdev {:.4}, RSD {:.2}%",
            self.count,
            self.mean,
            self.stdev,
            self.rsd_percent()
        )
    }
}

/// Compute calibration statistics from peak ratios directly.
///
/// Requires at least two finite ratios with a non-zero mean.
pub fn statistics(ratios: &[f64]) -> Result<CalibrationStats, CalibrationError> {
    let count = ratios.len();
    match count {
        0 => return Err(CalibrationError::NoStandards),
        1 => return Err(CalibrationError::SingleStandard),
        _ => {}
    }

    // Welford update: identical ratios leave `sum_sq` at exactly zero
    let mut mean = 0.0;
    let mut sum_sq = 0.0;
    for (i, &ratio) in ratios.iter().enumerate() {
        let delta = ratio - mean;
        mean += delta / (i + 1) as f64;
        sum_sq += delta * (ratio - mean);
    }
    if mean == 0.0 || !mean.is_finite() {
        return Err(CalibrationError::ZeroMeanPeakRatio);
    }

    let stdev = (sum_sq / (count - 1) as f64).sqrt();
    let rsd = stdev / mean;

    Ok(CalibrationStats {
        count,
        mean,
        stdev,
        rsd,
    })
}

/// Calibrate from the standard injections of `injections`.
///
/// Peak ratios must already be computed. A standard without a defined peak
/// ratio aborts calibration.
pub fn calibrate(injections: &InjectionSet) -> Result<CalibrationStats, CalibrationError> {
    let mut ratios = Vec::new();
    for standard in injections.standards() {
        let ratio = standard
            .peak_ratio
            .ok_or_else(|| CalibrationError::UndefinedPeakRatio {
                sample: standard.name.clone(),
            })?;
        ratios.push(ratio);
    }

    let stats = statistics(&ratios)?;
    debug!("Calibration: {}", stats);
    Ok(stats)
}
