use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Extension of generated workbooks
pub const REPORT_EXTENSION: &str = "xlsx";

/// Report file name for an input file: `<stem>_<YYYYMMDD>.xlsx`
pub fn output_file_name(input: &Path, date: NaiveDate) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "assay_report".to_string());
    format!("{}_{}.{}", stem, date.format("%Y%m%d"), REPORT_EXTENSION)
}

/// Full report path.
///
/// The report goes into `output_dir` when given, otherwise next to the input.
pub fn output_path(input: &Path, output_dir: Option<&Path>, date: NaiveDate) -> PathBuf {
    let name = output_file_name(input, date);
    match output_dir {
        Some(dir) => dir.join(name),
        None => match input.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        },
    }
}
