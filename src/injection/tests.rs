use super::*;

fn unknown(name: &str, primary: f64, internal: f64) -> Injection {
    let mut inj = Injection::new(name, "Unknown", SampleCategory::Unknown);
    inj.primary_area = primary;
    inj.internal_area = internal;
    inj
}

#[test]
fn test_new_injection_defaults() {
    let inj = Injection::new("Std 1", "Standard", SampleCategory::Standard);
    assert_eq!(inj.weight, 1.0);
    assert_eq!(inj.dilution, 1.0);
    assert_eq!(inj.primary_area, 0.0);
    assert_eq!(inj.internal_area, 0.0);
    assert!(inj.peak_ratio.is_none());
    assert!(inj.assay.is_none());
    assert!(inj.recovery.is_none());
    assert!(inj.is_standard());
}

#[test]
fn test_set_area_by_analyte() {
    let mut inj = Injection::new("S", "Unknown", SampleCategory::Unknown);
    inj.set_area(Analyte::Primary, 500.0);
    inj.set_area(Analyte::Internal, 250.0);
    assert_eq!(inj.area(Analyte::Primary), 500.0);
    assert_eq!(inj.area(Analyte::Internal), 250.0);
    assert_eq!(inj.ratio_of_areas(), Some(2.0));
}

#[test]
fn test_ratio_undefined_for_zero_internal_area() {
    let inj = unknown("S", 500.0, 0.0);
    assert_eq!(inj.ratio_of_areas(), None);
}

#[test]
fn test_set_keeps_insertion_order() {
    let mut set = InjectionSet::new();
    assert!(set.insert(unknown("zeta", 1.0, 1.0)));
    assert!(set.insert(unknown("alpha", 1.0, 1.0)));
    assert!(set.insert(unknown("mid", 1.0, 1.0)));

    let names: Vec<_> = set.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_set_rejects_duplicate_names() {
    let mut set = InjectionSet::new();
    assert!(set.insert(unknown("A", 1.0, 1.0)));
    assert!(!set.insert(unknown("A", 9.0, 9.0)));
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("A").unwrap().primary_area, 1.0);
}

#[test]
fn test_compute_peak_ratios_reports_issues() {
    let mut set = InjectionSet::new();
    set.insert(unknown("good", 500.0, 250.0));
    set.insert(unknown("bad", 500.0, 0.0));

    let issues = set.compute_peak_ratios();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].sample, "bad");
    assert_eq!(set.get("good").unwrap().peak_ratio, Some(2.0));
    assert_eq!(set.get("bad").unwrap().peak_ratio, None);
}

#[test]
fn test_category_filters() {
    let mut set = InjectionSet::new();
    set.insert(Injection::new("Std1", "Standard", SampleCategory::Standard));
    set.insert(unknown("U1", 1.0, 1.0));
    set.insert(Injection::new("Blank", "Blank", SampleCategory::Other));

    assert_eq!(set.standard_count(), 1);
    assert_eq!(set.unknown_count(), 1);
    assert_eq!(set.len(), 3);
}
