#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed exports must produce an error, never a panic
    if let Ok(mut run) = mga_assay::RecordParser::default().parse_reader(data) {
        run.injections.compute_peak_ratios();
        let _ = mga_assay::calibration::calibrate(&run.injections);
    }
});
