//! Averaging of duplicate injections of the same unknown sample.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::injection::{Injection, InjectionSet};

/// How unknown injections are grouped into duplicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingMode {
    /// Consecutive unknowns, two at a time, in file order
    #[default]
    Positional,
    /// Unknowns whose names differ only in a trailing injection number
    ByName,
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMode::Positional => write!(f, "positional"),
            PairingMode::ByName => write!(f, "by-name"),
        }
    }
}

impl FromStr for PairingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(PairingMode::Positional),
            "by-name" | "by_name" | "name" => Ok(PairingMode::ByName),
            other => Err(format!("unknown pairing mode '{other}'")),
        }
    }
}

/// Averaged results of one group of duplicate injections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Sample names in file order
    pub members: Vec<String>,

    /// Mean assay, `None` if any member has no assay
    pub assay: Option<f64>,

    /// Mean recovery, `None` if any member has no recovery
    pub recovery: Option<f64>,
}

impl DuplicateGroup {
    fn from_members(members: &[&Injection]) -> Self {
        Self {
            members: members.iter().map(|m| m.name.clone()).collect(),
            assay: mean_of(members.iter().map(|m| m.assay)),
            recovery: mean_of(members.iter().map(|m| m.recovery)),
        }
    }

    /// Name of the last member, the row the average is reported on
    pub fn last_member(&self) -> Option<&str> {
        self.members.last().map(String::as_str)
    }
}

fn mean_of(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let values: Option<Vec<f64>> = values.collect();
    let values = values?;
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Group the unknown injections of `injections` into duplicates and average them.
///
/// Positional pairing ignores names entirely; a trailing unpaired unknown is
/// not averaged. Name-based pairing groups every unknown sharing a
/// [`base_name`] and skips names that occur once.
pub fn pair_duplicates(injections: &InjectionSet, mode: PairingMode) -> Vec<DuplicateGroup> {
    let unknowns: Vec<&Injection> = injections.unknowns().collect();

    match mode {
        PairingMode::Positional => unknowns
            .chunks_exact(2)
            .map(DuplicateGroup::from_members)
            .collect(),
        PairingMode::ByName => {
            let mut order: Vec<&str> = Vec::new();
            let mut groups: HashMap<&str, Vec<&Injection>> = HashMap::new();
            for injection in unknowns {
                let key = base_name(&injection.name);
                groups
                    .entry(key)
                    .or_insert_with(|| {
                        order.push(key);
                        Vec::new()
                    })
                    .push(injection);
            }
            order
                .into_iter()
                .filter_map(|key| groups.get(key))
                .filter(|members| members.len() > 1)
                .map(|members| DuplicateGroup::from_members(members))
                .collect()
        }
    }
}

/// Sample name with a trailing injection token removed.
///
/// `"Feed A INJ2"`, `"Feed A inj 2"` and `"Feed A-INJ2"` all reduce to
/// `"Feed A"`. Names without such a token are returned trimmed.
pub fn base_name(name: &str) -> &str {
    let trimmed = name.trim_end();
    let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == trimmed.len() {
        return trimmed;
    }

    let before_digits = without_digits.trim_end();
    let split = match before_digits.len().checked_sub(3) {
        Some(split) => split,
        None => return trimmed,
    };
    let is_token = before_digits
        .get(split..)
        .map(|token| token.eq_ignore_ascii_case("inj"))
        .unwrap_or(false);
    if !is_token {
        return trimmed;
    }

    let stem = before_digits[..split]
        .trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == '_');
    if stem.is_empty() {
        trimmed
    } else {
        stem
    }
}
