/// Errors that can occur while building calibration statistics
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalibrationError {
    /// No standard injections in the run
    #[error("Missing standard injections; re-export the data including standard injections")]
    NoStandards,

    /// Exactly one standard; the sample standard deviation is undefined
    #[error("Only one standard injection; at least two are needed for a standard deviation")]
    SingleStandard,

    /// A standard has no internal standard area
    #[error("Standard '{sample}' has an undefined peak ratio (internal standard area is zero)")]
    UndefinedPeakRatio { sample: String },

    /// Mean peak ratio is zero, so RSD and assay values are undefined
    #[error("Mean standard peak ratio is zero")]
    ZeroMeanPeakRatio,
}
