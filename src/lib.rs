//! # MGA Feed Assay
//!
//! `mga_assay` processes injection results exported from a chromatography
//! data system for the MGA (melengestrol acetate) feed assay. It builds a
//! single-point calibration from the standard injections, derives the
//! concentration of every unknown sample and writes a spreadsheet report.
//!
//! ## Pipeline
//!
//! ```text
//! export (.txt) ──► parser ──► InjectionSet ──► calibration ──► assay ──► report
//!                                 (peak ratios)    (mean/RSD)    (ppb, %)   (.xlsx)
//! ```
//!
//! - [`parser`]: infers column roles from header rows and merges per-peak
//!   rows into one [`injection::Injection`] per sample.
//! - [`calibration`]: mean peak ratio, standard deviation and RSD over the
//!   standards.
//! - [`assay`]: assay concentration, recovery and duplicate averaging for
//!   the unknowns.
//! - [`report`]: workbook, terminal summary and JSON output.
//!
//! ## Quick Start
//!
//! ```rust
//! use mga_assay::assay::{calculate_assays, AssayParameters};
//! use mga_assay::calibration::calibrate;
//! use mga_assay::parser::RecordParser;
//!
//! let export = "SampleName\tSample Type\tName\tArea\n\
//!               Std 1\tStandard\tMelengestrol\t1000\n\
//!               Std 1\tStandard\tMegestrol\t1000\n\
//!               Std 2\tStandard\tMelengestrol\t1000\n\
//!               Std 2\tStandard\tMegestrol\t1000\n\
//!               Feed\tUnknown\tMelengestrol\t2000\n\
//!               Feed\tUnknown\tMegestrol\t1000\n";
//!
//! let mut run = RecordParser::default().parse_str(export)?;
//! run.injections.compute_peak_ratios();
//!
//! let calibration = calibrate(&run.injections)?;
//! let params = AssayParameters::new(1000.0);
//! calculate_assays(&mut run.injections, &calibration, &params)?;
//!
//! assert_eq!(run.injections.get("Feed").unwrap().assay, Some(2000.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assay;
pub mod calibration;
pub mod injection;
pub mod parser;
pub mod report;

/// Version of this tool, shown in reports and `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use assay::{AssayError, AssayParameters, PairingMode, SampleInputs};
pub use calibration::{CalibrationError, CalibrationStats};
pub use injection::{Injection, InjectionSet, SampleCategory};
pub use parser::{ParseError, ParsedRun, RecordParser, Vocabulary};
pub use report::{AssayReport, ReportError};
