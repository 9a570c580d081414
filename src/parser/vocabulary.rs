//! Matching vocabulary for header keywords, analyte names and sample types.
//!
//! All matching is case-sensitive substring matching. The defaults reproduce
//! the column headers and names used by Empower result exports.

use serde::{Deserialize, Serialize};

use crate::injection::{Analyte, SampleCategory};

/// Role a tab-separated column plays in the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    SampleType,
    PeakName,
    RetentionTime,
    Area,
    SampleName,
    Weight,
    Dilution,
}

impl ColumnRole {
    /// Human readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::SampleType => "sample type",
            ColumnRole::PeakName => "peak name",
            ColumnRole::RetentionTime => "retention time",
            ColumnRole::Area => "area",
            ColumnRole::SampleName => "sample name",
            ColumnRole::Weight => "sample weight",
            ColumnRole::Dilution => "dilution",
        }
    }
}

/// Outcome of classifying one header field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// Field names a column role
    Role(ColumnRole),
    /// Field is a known header with no role (kept out of data-row detection)
    Ignored,
    /// Field matched no keyword
    Unmatched,
}

/// Header keywords for each column role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderKeywords {
    pub sample_type: String,
    pub peak_name: String,
    /// A peak-name header must not contain this keyword
    pub peak_name_exclude: String,
    pub retention_time: String,
    pub area: String,
    pub sample_name: String,
    pub weight: String,
    pub dilution: String,
    /// Additional header keywords that carry no role
    pub ignored: Vec<String>,
}

impl Default for HeaderKeywords {
    fn default() -> Self {
        Self {
            sample_type: "Sample Type".to_string(),
            peak_name: "Name".to_string(),
            peak_name_exclude: "SampleName".to_string(),
            retention_time: "RT".to_string(),
            area: "Area".to_string(),
            sample_name: "SampleName".to_string(),
            weight: "SampleWeight".to_string(),
            dilution: "Dilution".to_string(),
            ignored: Vec::new(),
        }
    }
}

/// Complete matching vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Column header keywords
    pub headers: HeaderKeywords,

    /// Section banner whose row is never data
    pub banner: String,

    /// Peak name of the primary analyte
    pub primary_analyte: String,

    /// Peak name of the internal standard
    pub internal_analyte: String,

    /// Sample-type substring marking calibration standards
    pub standard_marker: String,

    /// Sample-type substring marking unknowns
    pub unknown_marker: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            headers: HeaderKeywords::default(),
            banner: "Peak Results".to_string(),
            primary_analyte: "Melengestrol".to_string(),
            internal_analyte: "Megestrol".to_string(),
            // matches both "Standard" and "standard"
            standard_marker: "tandard".to_string(),
            unknown_marker: "Unknown".to_string(),
        }
    }
}

impl Vocabulary {
    /// Classify a header field.
    ///
    /// Keywords are tried in a fixed priority order and the first hit wins,
    /// so "SampleName" is never taken as a peak-name header.
    pub fn classify_header(&self, field: &str) -> HeaderMatch {
        let h = &self.headers;
        let rules = [
            (ColumnRole::SampleType, h.sample_type.as_str()),
            (ColumnRole::PeakName, h.peak_name.as_str()),
            (ColumnRole::RetentionTime, h.retention_time.as_str()),
            (ColumnRole::Area, h.area.as_str()),
            (ColumnRole::SampleName, h.sample_name.as_str()),
            (ColumnRole::Weight, h.weight.as_str()),
            (ColumnRole::Dilution, h.dilution.as_str()),
        ];

        for (role, keyword) in rules {
            if keyword.is_empty() || !field.contains(keyword) {
                continue;
            }
            if role == ColumnRole::PeakName
                && !h.peak_name_exclude.is_empty()
                && field.contains(h.peak_name_exclude.as_str())
            {
                continue;
            }
            return HeaderMatch::Role(role);
        }

        if h.ignored.iter().any(|k| !k.is_empty() && field.contains(k.as_str())) {
            return HeaderMatch::Ignored;
        }

        HeaderMatch::Unmatched
    }

    /// Whether a field is the section banner
    pub fn is_banner(&self, field: &str) -> bool {
        !self.banner.is_empty() && field.contains(self.banner.as_str())
    }

    /// Identify which analyte a peak name refers to.
    ///
    /// The primary analyte is checked first.
    pub fn classify_analyte(&self, peak_name: &str) -> Option<Analyte> {
        if !self.primary_analyte.is_empty() && peak_name.contains(self.primary_analyte.as_str()) {
            Some(Analyte::Primary)
        } else if !self.internal_analyte.is_empty()
            && peak_name.contains(self.internal_analyte.as_str())
        {
            Some(Analyte::Internal)
        } else {
            None
        }
    }

    /// Classify a free-text sample type
    pub fn classify_sample_type(&self, sample_type: &str) -> SampleCategory {
        if !self.standard_marker.is_empty() && sample_type.contains(self.standard_marker.as_str()) {
            SampleCategory::Standard
        } else if !self.unknown_marker.is_empty()
            && sample_type.contains(self.unknown_marker.as_str())
        {
            SampleCategory::Unknown
        } else {
            SampleCategory::Other
        }
    }
}
