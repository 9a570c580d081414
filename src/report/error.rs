use std::path::PathBuf;

/// Errors that can occur while producing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Spreadsheet could not be assembled
    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error while staging the output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Output file could not be written (e.g. it is open in another program)
    #[error("Failed to write {}: {source}; check that the file is not open in another program", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
