use super::vocabulary::ColumnRole;

/// Errors that can occur while parsing an exported result file
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// I/O error reading the input
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    /// Low-level TSV reader error
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A data row needs a column that no header has named
    #[error("Line {line}: no {} column was located in any header row", .role.label())]
    MissingColumn { line: usize, role: ColumnRole },

    /// A data row is too short to contain a located column
    #[error("Line {line}: {} column is at position {index} but the row has only {width} fields", .role.label())]
    ShortRow {
        line: usize,
        role: ColumnRole,
        index: usize,
        width: usize,
    },

    /// A numeric cell could not be parsed
    #[error("Line {line}: invalid {} value '{value}'", .role.label())]
    InvalidNumber {
        line: usize,
        role: ColumnRole,
        value: String,
    },

    /// A data row carries an empty sample name
    #[error("Line {line}: sample name is empty")]
    EmptySampleName { line: usize },
}

impl ParseError {
    /// 1-based input line the error refers to, blank lines included
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MissingColumn { line, .. }
            | ParseError::ShortRow { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::EmptySampleName { line } => Some(*line),
            ParseError::IoError(_) | ParseError::CsvError(_) => None,
        }
    }
}
