//! # Injection Data Model
//!
//! One [`Injection`] exists per unique sample name in an exported result file.
//! Each injection is built incrementally: the export carries one row per
//! analyte peak, so a sample's two peak areas usually arrive on separate rows
//! and are merged into the same entity.
//!
//! The [`InjectionSet`] keeps entities in the order they first appeared in
//! the file. Report tables and duplicate pairing both depend on that order.

mod set;
mod types;

#[cfg(test)]
mod tests;

pub use set::{InjectionSet, PeakRatioIssue};
pub use types::{Analyte, Injection, SampleCategory};
