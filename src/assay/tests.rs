use super::*;
use crate::calibration::statistics;
use crate::injection::SampleCategory;

fn unit_calibration() -> CalibrationStats {
    CalibrationStats {
        count: 2,
        mean: 1.0,
        stdev: 0.0,
        rsd: 0.0,
    }
}

fn unknown(name: &str, ratio: Option<f64>) -> Injection {
    let mut inj = Injection::new(name, "Unknown", SampleCategory::Unknown);
    inj.peak_ratio = ratio;
    inj
}

fn set_of(injections: Vec<Injection>) -> InjectionSet {
    let mut set = InjectionSet::new();
    for inj in injections {
        set.insert(inj);
    }
    set
}

#[test]
fn test_assay_formula() {
    let mut set = set_of(vec![unknown("U1", Some(2.0))]);
    let params = AssayParameters::new(1000.0);

    let outcome = calculate_assays(&mut set, &unit_calibration(), &params).unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.computed, 1);
    assert_eq!(set.get("U1").unwrap().assay, Some(2000.0));
    assert_eq!(set.get("U1").unwrap().recovery, None);
}

#[test]
fn test_recovery() {
    let mut set = set_of(vec![unknown("U1", Some(2.0))]);
    let params = AssayParameters::new(1000.0).with_recovery(2000.0);

    calculate_assays(&mut set, &unit_calibration(), &params).unwrap();
    assert_eq!(set.get("U1").unwrap().recovery, Some(1.0));
}

#[test]
fn test_dilution_and_weight_scale_assay() {
    let mut inj = unknown("U1", Some(1.5));
    inj.dilution = 10.0;
    inj.weight = 2.5;
    let calibration = statistics(&[0.5, 0.5]).unwrap();
    let params = AssayParameters::new(200.0);

    let (assay, _) = assay_for(&inj, &calibration, &params).unwrap();
    // (1.5 / 0.5) * 200 * (10 / 2.5)
    assert!((assay - 2400.0).abs() < 1e-9);
}

#[test]
fn test_zero_weight_is_flagged_per_sample() {
    let mut bad = unknown("Heavy", Some(2.0));
    bad.weight = 0.0;
    let mut set = set_of(vec![bad, unknown("Fine", Some(1.0))]);

    let outcome =
        calculate_assays(&mut set, &unit_calibration(), &AssayParameters::new(100.0)).unwrap();
    assert_eq!(outcome.computed, 1);
    assert_eq!(
        outcome.failures,
        vec![AssayError::ZeroWeight {
            sample: "Heavy".to_string()
        }]
    );
    assert_eq!(set.get("Heavy").unwrap().assay, None);
    assert_eq!(set.get("Fine").unwrap().assay, Some(100.0));
}

#[test]
fn test_undefined_ratio_is_flagged_per_sample() {
    let mut set = set_of(vec![unknown("NoIS", None)]);
    let outcome =
        calculate_assays(&mut set, &unit_calibration(), &AssayParameters::new(100.0)).unwrap();

    assert_eq!(outcome.failures[0].sample(), Some("NoIS"));
    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, AssayError::UndefinedPeakRatio { .. }));
}

#[test]
fn test_standards_are_not_modified() {
    let mut std = Injection::new("Std 1", "Standard", SampleCategory::Standard);
    std.peak_ratio = Some(1.0);
    let mut set = set_of(vec![std.clone(), unknown("U1", Some(1.0))]);

    calculate_assays(&mut set, &unit_calibration(), &AssayParameters::new(100.0)).unwrap();
    assert_eq!(set.get("Std 1").unwrap(), &std);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let mut set = set_of(vec![unknown("U1", Some(1.0))]);
    let calibration = unit_calibration();

    let err = calculate_assays(&mut set, &calibration, &AssayParameters::new(0.0)).unwrap_err();
    assert!(matches!(
        err,
        AssayError::InvalidParameter {
            name: "standard concentration",
            ..
        }
    ));

    let params = AssayParameters::new(100.0).with_recovery(f64::NAN);
    let err = calculate_assays(&mut set, &calibration, &params).unwrap_err();
    assert!(matches!(
        err,
        AssayError::InvalidParameter {
            name: "expected potency",
            ..
        }
    ));
    assert_eq!(set.get("U1").unwrap().assay, None);
}

#[test]
fn test_sample_inputs_apply_to_unknowns_only() {
    let mut std = Injection::new("Std 1", "Standard", SampleCategory::Standard);
    std.weight = 1.0;
    let mut set = set_of(vec![std, unknown("U1", None), unknown("U2", None)]);

    let mut inputs = SampleInputs::new();
    inputs.set_weight("U1", 2.0);
    inputs.default_weight = Some(5.0);
    inputs.default_dilution = Some(4.0);
    inputs.apply(&mut set);

    assert_eq!(set.get("U1").unwrap().weight, 2.0);
    assert_eq!(set.get("U2").unwrap().weight, 5.0);
    assert_eq!(set.get("U1").unwrap().dilution, 4.0);
    assert_eq!(set.get("Std 1").unwrap().weight, 1.0);
    assert_eq!(set.get("Std 1").unwrap().dilution, 1.0);
}

#[test]
fn test_empty_sample_inputs_keep_parsed_values() {
    let mut inj = unknown("U1", None);
    inj.weight = 3.3;
    inj.dilution = 7.0;
    let mut set = set_of(vec![inj]);

    let inputs = SampleInputs::new();
    assert!(inputs.is_empty());
    inputs.apply(&mut set);
    assert_eq!(set.get("U1").unwrap().weight, 3.3);
    assert_eq!(set.get("U1").unwrap().dilution, 7.0);
}

fn with_results(name: &str, assay: Option<f64>, recovery: Option<f64>) -> Injection {
    let mut inj = unknown(name, Some(1.0));
    inj.assay = assay;
    inj.recovery = recovery;
    inj
}

#[test]
fn test_positional_pairing() {
    let set = set_of(vec![
        with_results("A INJ1", Some(100.0), Some(0.5)),
        with_results("A INJ2", Some(110.0), Some(1.5)),
        with_results("B INJ1", Some(200.0), Some(1.0)),
    ]);

    let groups = pair_duplicates(&set, PairingMode::Positional);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members, vec!["A INJ1", "A INJ2"]);
    assert_eq!(groups[0].assay, Some(105.0));
    assert_eq!(groups[0].recovery, Some(1.0));
    assert_eq!(groups[0].last_member(), Some("A INJ2"));
}

#[test]
fn test_positional_pairing_ignores_names() {
    let set = set_of(vec![
        with_results("A INJ1", Some(100.0), None),
        with_results("B INJ1", Some(300.0), None),
    ]);
    let groups = pair_duplicates(&set, PairingMode::Positional);
    assert_eq!(groups[0].assay, Some(200.0));
    assert_eq!(groups[0].recovery, None);
}

#[test]
fn test_pairing_skips_non_unknowns() {
    let mut std = Injection::new("Std", "Standard", SampleCategory::Standard);
    std.assay = Some(1.0);
    let set = set_of(vec![
        with_results("A INJ1", Some(100.0), None),
        std,
        with_results("A INJ2", Some(120.0), None),
    ]);
    let groups = pair_duplicates(&set, PairingMode::Positional);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].assay, Some(110.0));
}

#[test]
fn test_by_name_pairing() {
    let set = set_of(vec![
        with_results("Feed A INJ1", Some(100.0), None),
        with_results("Feed B INJ1", Some(300.0), None),
        with_results("Feed A INJ2", Some(200.0), None),
        with_results("Feed C", Some(50.0), None),
        with_results("Feed B inj 2", Some(100.0), None),
    ]);

    let groups = pair_duplicates(&set, PairingMode::ByName);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, vec!["Feed A INJ1", "Feed A INJ2"]);
    assert_eq!(groups[0].assay, Some(150.0));
    assert_eq!(groups[1].members, vec!["Feed B INJ1", "Feed B inj 2"]);
    assert_eq!(groups[1].assay, Some(200.0));
}

#[test]
fn test_average_undefined_when_member_failed() {
    let set = set_of(vec![
        with_results("A INJ1", Some(100.0), None),
        with_results("A INJ2", None, None),
    ]);
    let groups = pair_duplicates(&set, PairingMode::ByName);
    assert_eq!(groups[0].assay, None);
}

#[test]
fn test_base_name() {
    assert_eq!(base_name("sampleName INJ1"), "sampleName");
    assert_eq!(base_name("sampleName INJ2"), "sampleName");
    assert_eq!(base_name("sample Name INJ2"), "sample Name");
    assert_eq!(base_name("Feed-inj 12"), "Feed");
    assert_eq!(base_name("Feed_Inj3 "), "Feed");
    assert_eq!(base_name("Feed 12"), "Feed 12");
    assert_eq!(base_name("INJ1"), "INJ1");
    assert_eq!(base_name("Lot 7"), "Lot 7");
}

#[test]
fn test_pairing_mode_parsing() {
    assert_eq!("positional".parse::<PairingMode>().unwrap(), PairingMode::Positional);
    assert_eq!("By-Name".parse::<PairingMode>().unwrap(), PairingMode::ByName);
    assert!("fuzzy".parse::<PairingMode>().is_err());
}
