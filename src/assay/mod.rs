//! # Assay Calculator
//!
//! Derives the concentration of every unknown injection from the
//! calibration mean:
//!
//! ```text
//! assay = (peak ratio / mean standard peak ratio) * standard concentration * (dilution / weight)
//! ```
//!
//! and, when recovery is requested, `recovery = assay / expected potency`.
//!
//! Failures for individual samples (undefined peak ratio, zero weight) do not
//! stop the calculation. The affected injection keeps `assay = None` and the
//! failure is listed in the returned [`AssayOutcome`]. Callers that prefer to
//! abort can use [`AssayOutcome::into_result`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationStats;
use crate::injection::{Injection, InjectionSet};

mod duplicates;
mod error;
mod inputs;

#[cfg(test)]
mod tests;

pub use duplicates::{base_name, pair_duplicates, DuplicateGroup, PairingMode};
pub use error::AssayError;
pub use inputs::SampleInputs;

/// Recovery calculation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryParameters {
    /// Expected sample potency in ppb
    pub expected_potency: f64,
}

/// Inputs shared by every assay calculation in a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssayParameters {
    /// Concentration of the calibration standard in ppb
    pub standard_concentration: f64,

    /// Recovery settings; `None` disables recovery
    pub recovery: Option<RecoveryParameters>,
}

impl AssayParameters {
    pub fn new(standard_concentration: f64) -> Self {
        Self {
            standard_concentration,
            recovery: None,
        }
    }

    /// Enable recovery against the given expected potency
    pub fn with_recovery(mut self, expected_potency: f64) -> Self {
        self.recovery = Some(RecoveryParameters { expected_potency });
        self
    }

    pub fn recovery_enabled(&self) -> bool {
        self.recovery.is_some()
    }

    /// Check that every parameter is a finite, positive number
    pub fn validate(&self) -> Result<(), AssayError> {
        check_positive("standard concentration", self.standard_concentration)?;
        if let Some(recovery) = self.recovery {
            check_positive("expected potency", recovery.expected_potency)?;
        }
        Ok(())
    }
}

/// Accept only finite values above zero
pub fn check_positive(name: &'static str, value: f64) -> Result<(), AssayError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AssayError::InvalidParameter { name, value })
    }
}

/// Result of an assay pass over a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssayOutcome {
    /// Number of unknowns with a computed assay
    pub computed: usize,

    /// Per-sample failures, in file order
    pub failures: Vec<AssayError>,
}

impl AssayOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn the first per-sample failure into an error
    pub fn into_result(self) -> Result<usize, AssayError> {
        match self.failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.computed),
        }
    }
}

/// Assay and recovery for a single unknown injection
pub fn assay_for(
    injection: &Injection,
    calibration: &CalibrationStats,
    params: &AssayParameters,
) -> Result<(f64, Option<f64>), AssayError> {
    let ratio = injection
        .peak_ratio
        .ok_or_else(|| AssayError::UndefinedPeakRatio {
            sample: injection.name.clone(),
        })?;
    if injection.weight == 0.0 {
        return Err(AssayError::ZeroWeight {
            sample: injection.name.clone(),
        });
    }

    let assay = (ratio / calibration.mean)
        * params.standard_concentration
        * (injection.dilution / injection.weight);
    if !assay.is_finite() {
        return Err(AssayError::NonFiniteResult {
            sample: injection.name.clone(),
        });
    }

    let recovery = params
        .recovery
        .map(|recovery| assay / recovery.expected_potency);
    Ok((assay, recovery))
}

/// Compute assay (and recovery) for every unknown injection.
///
/// Standards and other injections are left untouched. Parameter validation
/// failures abort before any injection is modified.
pub fn calculate_assays(
    injections: &mut InjectionSet,
    calibration: &CalibrationStats,
    params: &AssayParameters,
) -> Result<AssayOutcome, AssayError> {
    params.validate()?;

    let mut outcome = AssayOutcome::default();
    for injection in injections.unknowns_mut() {
        match assay_for(injection, calibration, params) {
            Ok((assay, recovery)) => {
                debug!(
                    "Sample '{}': assay {:.3} ppb, recovery {:?}",
                    injection.name, assay, recovery
                );
                injection.assay = Some(assay);
                injection.recovery = recovery;
                outcome.computed += 1;
            }
            Err(err) => {
                warn!("{}", err);
                injection.assay = None;
                injection.recovery = None;
                outcome.failures.push(err);
            }
        }
    }

    Ok(outcome)
}
