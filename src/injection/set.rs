use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::{Injection, SampleCategory};

/// Entity whose peak ratio could not be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakRatioIssue {
    /// Sample name of the offending injection
    pub sample: String,
    /// Category of the offending injection
    pub category: SampleCategory,
}

impl fmt::Display for PeakRatioIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample '{}' has no internal standard area; peak ratio is undefined",
            self.sample
        )
    }
}

/// Insertion-ordered collection of injections keyed by sample name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InjectionSet {
    entries: Vec<Injection>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl InjectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Injection> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Injection> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Insert a new injection.
    ///
    /// Returns `false` and leaves the set untouched if an injection with the
    /// same name already exists.
    pub fn insert(&mut self, injection: Injection) -> bool {
        if self.index.contains_key(&injection.name) {
            return false;
        }
        self.index.insert(injection.name.clone(), self.entries.len());
        self.entries.push(injection);
        true
    }

    /// All injections in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = &Injection> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Injection> {
        self.entries.iter_mut()
    }

    pub fn standards(&self) -> impl Iterator<Item = &Injection> {
        self.entries.iter().filter(|inj| inj.is_standard())
    }

    pub fn unknowns(&self) -> impl Iterator<Item = &Injection> {
        self.entries.iter().filter(|inj| inj.is_unknown())
    }

    pub fn unknowns_mut(&mut self) -> impl Iterator<Item = &mut Injection> {
        self.entries.iter_mut().filter(|inj| inj.is_unknown())
    }

    pub fn standard_count(&self) -> usize {
        self.standards().count()
    }

    pub fn unknown_count(&self) -> usize {
        self.unknowns().count()
    }

    /// Fill `peak_ratio` for every injection.
    ///
    /// Injections without an internal standard area keep `peak_ratio = None`
    /// and are reported back to the caller.
    pub fn compute_peak_ratios(&mut self) -> Vec<PeakRatioIssue> {
        let mut issues = Vec::new();
        for injection in &mut self.entries {
            injection.peak_ratio = injection.ratio_of_areas();
            if injection.peak_ratio.is_none() {
                issues.push(PeakRatioIssue {
                    sample: injection.name.clone(),
                    category: injection.category,
                });
            }
        }
        issues
    }
}

impl<'a> IntoIterator for &'a InjectionSet {
    type Item = &'a Injection;
    type IntoIter = std::slice::Iter<'a, Injection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
