/// Errors raised by the assay calculator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssayError {
    /// A calculation parameter is missing a usable value
    #[error("Invalid {name}: {value} (must be a finite, positive number)")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Unknown sample has no defined peak ratio
    #[error("Sample '{sample}': peak ratio is undefined (internal standard area is zero)")]
    UndefinedPeakRatio { sample: String },

    /// Unknown sample weight of zero
    #[error("Sample '{sample}': weight is zero")]
    ZeroWeight { sample: String },

    /// Result is not a finite number
    #[error("Sample '{sample}': assay result is not a finite number")]
    NonFiniteResult { sample: String },
}

impl AssayError {
    /// Sample the error concerns, if it is a per-sample failure
    pub fn sample(&self) -> Option<&str> {
        match self {
            AssayError::UndefinedPeakRatio { sample }
            | AssayError::ZeroWeight { sample }
            | AssayError::NonFiniteResult { sample } => Some(sample),
            AssayError::InvalidParameter { .. } => None,
        }
    }
}
