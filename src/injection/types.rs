use serde::{Deserialize, Serialize};

/// Which of the two tracked peaks a row belongs to.
///
/// `Primary` is the analyte (Melengestrol), `Internal` is the internal
/// standard peak (Megestrol) used as the ratio denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analyte {
    /// Numerator peak of the peak ratio
    Primary,
    /// Denominator peak of the peak ratio
    Internal,
}

/// Role of an injection in the run, derived from its free-text sample type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleCategory {
    /// Calibration reference of known concentration
    Standard,
    /// Sample whose concentration is to be determined
    Unknown,
    /// Anything else (blanks, system suitability, ...)
    #[default]
    Other,
}

/// A single analysed sample and its derived results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injection {
    /// Sample name (unique key within a run)
    pub name: String,

    /// Sample type exactly as exported
    pub sample_type: String,

    /// Category classified from `sample_type` when the entity was created
    pub category: SampleCategory,

    /// Peak area of the primary analyte (Melengestrol)
    pub primary_area: f64,

    /// Peak area of the internal standard (Megestrol)
    pub internal_area: f64,

    /// `primary_area / internal_area`; `None` until computed or when undefined
    pub peak_ratio: Option<f64>,

    /// Dilution factor
    pub dilution: f64,

    /// Sample weight in grams
    pub weight: f64,

    /// Calculated concentration in ppb
    pub assay: Option<f64>,

    /// `assay / expected potency`, as a fraction
    pub recovery: Option<f64>,
}

impl Injection {
    /// Create an injection with default weight and dilution of 1.0
    pub fn new(name: impl Into<String>, sample_type: impl Into<String>, category: SampleCategory) -> Self {
        Self {
            name: name.into(),
            sample_type: sample_type.into(),
            category,
            primary_area: 0.0,
            internal_area: 0.0,
            peak_ratio: None,
            dilution: 1.0,
            weight: 1.0,
            assay: None,
            recovery: None,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.category == SampleCategory::Standard
    }

    pub fn is_unknown(&self) -> bool {
        self.category == SampleCategory::Unknown
    }

    /// Store the area for the given analyte, replacing any earlier value
    pub fn set_area(&mut self, analyte: Analyte, area: f64) {
        match analyte {
            Analyte::Primary => self.primary_area = area,
            Analyte::Internal => self.internal_area = area,
        }
    }

    /// Area recorded for the given analyte
    pub fn area(&self, analyte: Analyte) -> f64 {
        match analyte {
            Analyte::Primary => self.primary_area,
            Analyte::Internal => self.internal_area,
        }
    }

    /// Ratio of the two peak areas, or `None` when the internal area is zero
    /// or the quotient is not finite.
    pub fn ratio_of_areas(&self) -> Option<f64> {
        if self.internal_area == 0.0 {
            return None;
        }
        let ratio = self.primary_area / self.internal_area;
        ratio.is_finite().then_some(ratio)
    }
}
