use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::injection::InjectionSet;

/// Operator-supplied weights and dilutions for unknown samples.
///
/// Per-sample values win over defaults. Defaults only touch unknowns that
/// have no per-sample value, and leave parsed values alone when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleInputs {
    /// Weight in grams by sample name
    pub weights: HashMap<String, f64>,

    /// Dilution factor by sample name
    pub dilutions: HashMap<String, f64>,

    /// Weight applied to every other unknown
    pub default_weight: Option<f64>,

    /// Dilution applied to every other unknown
    pub default_dilution: Option<f64>,
}

impl SampleInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
            && self.dilutions.is_empty()
            && self.default_weight.is_none()
            && self.default_dilution.is_none()
    }

    pub fn set_weight(&mut self, sample: impl Into<String>, weight: f64) {
        self.weights.insert(sample.into(), weight);
    }

    pub fn set_dilution(&mut self, sample: impl Into<String>, dilution: f64) {
        self.dilutions.insert(sample.into(), dilution);
    }

    /// Write weights and dilutions into the unknown injections of `injections`
    pub fn apply(&self, injections: &mut InjectionSet) {
        for injection in injections.unknowns_mut() {
            if let Some(weight) = self
                .weights
                .get(&injection.name)
                .copied()
                .or(self.default_weight)
            {
                injection.weight = weight;
            }
            if let Some(dilution) = self
                .dilutions
                .get(&injection.name)
                .copied()
                .or(self.default_dilution)
            {
                injection.dilution = dilution;
            }
            debug!(
                "Sample '{}': weight {} g, dilution {}",
                injection.name, injection.weight, injection.dilution
            );
        }
    }
}
