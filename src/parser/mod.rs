//! # Record Parser
//!
//! Turns an exported, tab-delimited result file into an [`InjectionSet`].
//!
//! Exports carry no fixed schema. Column roles are inferred from header rows
//! by keyword matching, and every later data row is read through those
//! roles. A row is data when at least one of its fields matches no header
//! keyword and none of its fields is the "Peak Results" section banner.
//!
//! Each data row describes one peak of one sample. The first row seen for a
//! sample creates its [`Injection`]; later rows for the same sample only
//! fill in the area of the peak they describe.
//!
//! ## Usage
//!
//! ```rust
//! use mga_assay::parser::RecordParser;
//!
//! let export = "SampleName\tSample Type\tName\tArea\r\
//!               Std 1\tStandard\tMelengestrol\t500\r\
//!               Std 1\tStandard\tMegestrol\t250\r";
//!
//! let run = RecordParser::default().parse_str(export)?;
//! assert_eq!(run.injections.len(), 1);
//! assert_eq!(run.standard_count, 1);
//! # Ok::<(), mga_assay::parser::ParseError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, trace};
use serde::Serialize;

use crate::injection::{Injection, InjectionSet, SampleCategory};

mod columns;
mod error;
mod vocabulary;


pub use columns::ColumnRoles;
pub use error::ParseError;
pub use vocabulary::{ColumnRole, HeaderKeywords, HeaderMatch, Vocabulary};

/// Field delimiter of the export format
pub const DELIMITER: char = '\t';

/// How a line was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Line contained no fields
    Blank,
    /// Header or banner line; column roles may have changed
    Header,
    /// Data row that created a new injection
    NewSample,
    /// Data row merged into an existing injection
    MergedSample,
}

/// Parser state carried from line to line within one file
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Column roles located so far
    pub columns: ColumnRoles,

    /// Matching rules
    pub vocabulary: Vocabulary,

    /// Number of distinct standard injections seen
    pub standard_count: usize,

    /// Number of data rows consumed
    pub data_rows: usize,

    /// 1-based number of the last input line consumed, blank lines included
    pub line: usize,
}

/// Result of parsing a whole export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRun {
    /// Injections in first-appearance order
    pub injections: InjectionSet,

    /// Column roles in effect at the end of the file
    pub columns: ColumnRoles,

    /// Number of distinct standard injections
    pub standard_count: usize,

    /// Number of data rows read
    pub data_rows: usize,
}

/// Line-oriented parser for exported injection results
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    context: ParseContext,
}

impl RecordParser {
    /// Create a parser using the given matching vocabulary
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            context: ParseContext {
                vocabulary,
                ..Default::default()
            },
        }
    }

    /// Current parser state
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Parse one raw line and merge it into `injections`.
    ///
    /// The line is split on [`DELIMITER`]; line terminators are stripped.
    pub fn parse_line(
        &mut self,
        line: &str,
        injections: &mut InjectionSet,
    ) -> Result<LineKind, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        self.ingest_fields(&fields, injections)
    }

    /// Interpret an already split line and merge it into `injections`.
    ///
    /// Every call counts as one input line, blank or not.
    pub fn ingest_fields(
        &mut self,
        fields: &[&str],
        injections: &mut InjectionSet,
    ) -> Result<LineKind, ParseError> {
        let line = self.context.line + 1;
        self.ingest_line(line, fields, injections)
    }

    fn ingest_line(
        &mut self,
        line: usize,
        fields: &[&str],
        injections: &mut InjectionSet,
    ) -> Result<LineKind, ParseError> {
        self.context.line = line;
        if fields.iter().all(|f| f.trim().is_empty()) {
            return Ok(LineKind::Blank);
        }

        let vocabulary = &self.context.vocabulary;
        let mut has_unmatched = false;
        let mut has_banner = false;
        let mut roles = Vec::new();

        for (index, field) in fields.iter().enumerate() {
            match vocabulary.classify_header(field) {
                HeaderMatch::Role(role) => roles.push((role, index)),
                HeaderMatch::Ignored => {}
                HeaderMatch::Unmatched => has_unmatched = true,
            }
            if vocabulary.is_banner(field) {
                has_banner = true;
            }
        }

        if !has_unmatched || has_banner {
            for (role, index) in roles {
                trace!("Line {}: {} column at position {}", line, role.label(), index);
                self.context.columns.assign(role, index);
            }
            return Ok(LineKind::Header);
        }

        self.ingest_data_row(line, fields, injections)
    }

    fn ingest_data_row(
        &mut self,
        line: usize,
        fields: &[&str],
        injections: &mut InjectionSet,
    ) -> Result<LineKind, ParseError> {
        let columns = self.context.columns;
        let vocabulary = &self.context.vocabulary;

        let sample_name = columns
            .field(ColumnRole::SampleName, fields, line)?
            .trim();
        if sample_name.is_empty() {
            return Err(ParseError::EmptySampleName { line });
        }
        let sample_type = columns.field(ColumnRole::SampleType, fields, line)?.trim();
        let peak_name = columns.field(ColumnRole::PeakName, fields, line)?;
        let area_field = columns.field(ColumnRole::Area, fields, line)?;

        let analyte = vocabulary.classify_analyte(peak_name);
        let area = match analyte {
            Some(_) => parse_number(area_field, ColumnRole::Area, line)?,
            None => None,
        };

        self.context.data_rows += 1;

        if let Some(existing) = injections.get_mut(sample_name) {
            if let (Some(analyte), Some(area)) = (analyte, area) {
                existing.set_area(analyte, area);
            }
            return Ok(LineKind::MergedSample);
        }

        let category = vocabulary.classify_sample_type(sample_type);
        let mut injection = Injection::new(sample_name, sample_type, category);

        if columns.has_weight() {
            let cell = columns.field(ColumnRole::Weight, fields, line)?;
            if let Some(weight) = parse_number(cell, ColumnRole::Weight, line)? {
                injection.weight = weight;
            }
        }
        if columns.has_dilution() {
            let cell = columns.field(ColumnRole::Dilution, fields, line)?;
            if let Some(dilution) = parse_number(cell, ColumnRole::Dilution, line)? {
                injection.dilution = dilution;
            }
        }
        if let (Some(analyte), Some(area)) = (analyte, area) {
            injection.set_area(analyte, area);
        }

        if category == SampleCategory::Standard {
            self.context.standard_count += 1;
        }

        debug!("Line {}: new {:?} sample '{}'", line, category, sample_name);
        injections.insert(injection);
        Ok(LineKind::NewSample)
    }

    /// Parse a complete export held in memory
    pub fn parse_str(self, text: &str) -> Result<ParsedRun, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse a complete export from a file
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<ParsedRun, ParseError> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parse a complete export from a reader.
    ///
    /// Records may be terminated by `\r`, `\n` or `\r\n`. Fields that are not
    /// valid UTF-8 are decoded lossily. Error line numbers count every line
    /// of the input, blank ones included.
    pub fn parse_reader<R: Read>(mut self, mut reader: R) -> Result<ParsedRun, ParseError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let line_starts = LineStarts::new(&data);

        let mut tsv_reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER as u8)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .terminator(csv::Terminator::CRLF)
            .from_reader(data.as_slice());

        let mut injections = InjectionSet::new();
        let mut record = csv::ByteRecord::new();

        while tsv_reader.read_byte_record(&mut record)? {
            let offset = record.position().map_or(0, |pos| pos.byte() as usize);
            let line = line_starts.line_of_record(&data, offset);
            let owned: Vec<String> = record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            let fields: Vec<&str> = owned.iter().map(String::as_str).collect();
            self.ingest_line(line, &fields, &mut injections)?;
        }

        Ok(self.finish(injections))
    }

    /// Close the parser and package the parsed injections
    pub fn finish(self, injections: InjectionSet) -> ParsedRun {
        ParsedRun {
            injections,
            columns: self.context.columns,
            standard_count: self.context.standard_count,
            data_rows: self.context.data_rows,
        }
    }
}

/// Byte offsets at which each input line starts
struct LineStarts(Vec<usize>);

impl LineStarts {
    fn new(data: &[u8]) -> Self {
        let mut starts = vec![0];
        let mut i = 0;
        while i < data.len() {
            match data[i] {
                b'\r' if data.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    starts.push(i);
                }
                b'\r' | b'\n' => {
                    i += 1;
                    starts.push(i);
                }
                _ => i += 1,
            }
        }
        Self(starts)
    }

    /// 1-based line of a record whose read began at `offset`.
    ///
    /// The reader positions a record where the previous one ended, so any
    /// skipped blank lines sit between `offset` and the record's first byte.
    fn line_of_record(&self, data: &[u8], offset: usize) -> usize {
        let offset = offset.min(data.len());
        let start = data[offset..]
            .iter()
            .position(|b| *b != b'\r' && *b != b'\n')
            .map_or(data.len(), |skip| offset + skip);
        match self.0.binary_search(&start) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }
}

/// Parse a numeric cell; empty cells yield `None`
fn parse_number(cell: &str, role: ColumnRole, line: usize) -> Result<Option<f64>, ParseError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ParseError::InvalidNumber {
            line,
            role,
            value: cell.to_string(),
        }),
    }
}
