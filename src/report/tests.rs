use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::*;
use crate::assay::{calculate_assays, pair_duplicates};
use crate::calibration::calibrate;
use crate::injection::SampleCategory;

fn sample(name: &str, category: SampleCategory, primary: f64, internal: f64) -> Injection {
    let kind = match category {
        SampleCategory::Standard => "Standard",
        SampleCategory::Unknown => "Unknown",
        SampleCategory::Other => "Blank",
    };
    let mut inj = Injection::new(name, kind, category);
    inj.primary_area = primary;
    inj.internal_area = internal;
    inj
}

fn processed_report(recovery: bool) -> AssayReport {
    let mut set = InjectionSet::new();
    set.insert(sample("Std 1", SampleCategory::Standard, 1000.0, 1000.0));
    set.insert(sample("Std 2", SampleCategory::Standard, 1000.0, 1000.0));
    set.insert(sample("Feed INJ1", SampleCategory::Unknown, 2000.0, 1000.0));
    set.insert(sample("Feed INJ2", SampleCategory::Unknown, 2200.0, 1000.0));
    set.insert(sample("Broken", SampleCategory::Unknown, 2200.0, 0.0));
    set.compute_peak_ratios();

    let calibration = calibrate(&set).unwrap();
    let mut params = AssayParameters::new(1000.0);
    if recovery {
        params = params.with_recovery(2000.0);
    }
    let outcome = calculate_assays(&mut set, &calibration, &params).unwrap();
    let groups = pair_duplicates(&set, PairingMode::Positional);

    AssayReport::new("run.txt", set, calibration, params)
        .with_failures(&outcome.failures)
        .with_duplicates(DuplicateSection {
            mode: PairingMode::Positional,
            groups,
        })
}

#[test]
fn test_output_file_name() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    assert_eq!(
        output_file_name(Path::new("exports/run1.txt"), date),
        "run1_20260307.xlsx"
    );
    assert_eq!(
        output_path(Path::new("exports/run1.txt"), None, date),
        PathBuf::from("exports/run1_20260307.xlsx")
    );
    assert_eq!(
        output_path(Path::new("run1.txt"), Some(Path::new("out")), date),
        PathBuf::from("out/run1_20260307.xlsx")
    );
}

#[test]
fn test_unknown_headers() {
    assert_eq!(unknown_headers(false, false).len(), 7);
    let all = unknown_headers(true, true);
    assert_eq!(all.len(), 10);
    assert_eq!(all[7], "Recovery");
    assert_eq!(all[9], "Average Recovery for Duplicates");
    assert_eq!(unknown_headers(false, true).last(), Some(&"Average Assay for Duplicates (ppb)"));
}

#[test]
fn test_duplicate_section_lookup() {
    let report = processed_report(false);
    let section = report.duplicates.as_ref().unwrap();
    assert!(section.group_ending_at("Feed INJ1").is_none());
    let group = section.group_ending_at("Feed INJ2").unwrap();
    assert_eq!(group.assay, Some(2100.0));
    // "Broken" is the odd unknown out
    assert!(section.group_ending_at("Broken").is_none());
}

#[test]
fn test_summary_display() {
    let report = processed_report(true);
    let text = format!("{}", report);

    assert!(text.contains("MGA Feed Assay Report"));
    assert!(text.contains("2 standards"));
    assert!(text.contains("RSD within 10% limit"));
    assert!(text.contains("Feed INJ1"));
    assert!(text.contains("100.00%"));
    assert!(text.contains("Calculation errors"));
    assert!(text.contains("Broken"));
}

#[test]
fn test_failed_calibration_is_flagged() {
    let report = processed_report(false).with_rsd_threshold(-1.0);
    assert!(!report.calibration_passed());
    assert!(format!("{}", report).contains("RSD exceeds"));
}

#[test]
fn test_rsd_limit_is_rendered_with_fixed_precision() {
    let report = processed_report(false).with_rsd_threshold(7.0 / 100.0);
    assert_eq!(report.rsd_limit_label(), "7");

    let text = report.to_string();
    assert!(text.contains("7% limit"));
    assert!(!text.contains("7.000000"));

    assert_eq!(percent_label(0.10), "10");
    assert_eq!(percent_label(0.125), "12.5");
    assert_eq!(percent_label(0.0), "0");
}

#[test]
fn test_json_contains_results() {
    let report = processed_report(true);
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["source"], "run.txt");
    assert_eq!(json["calibration"]["count"], 2);
    let injections = json["injections"].as_array().unwrap();
    assert_eq!(injections.len(), 5);
    assert_eq!(injections[2]["name"], "Feed INJ1");
    assert_eq!(injections[2]["assay"], 2000.0);
    assert!(injections[4]["assay"].is_null());
}

#[test]
fn test_workbook_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_20260101.xlsx");

    write_workbook(&processed_report(true), &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.len() > 100);
    // xlsx files are zip archives
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_workbook_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xlsx");
    std::fs::write(&path, b"stale").unwrap();

    write_workbook(&processed_report(false), &path).unwrap();
    assert_eq!(&std::fs::read(&path).unwrap()[..2], b"PK");
}

#[test]
fn test_workbook_write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.xlsx");

    let err = write_workbook(&processed_report(false), &path).unwrap_err();
    assert!(matches!(err, ReportError::Write { .. }));
}
