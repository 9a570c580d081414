use std::io::Write;
use std::path::Path;

use log::info;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};

use super::{AssayReport, ReportError};

const SHEET_NAME: &str = "Sheet1";
const NOT_AVAILABLE: &str = "n/a";

/// Column headers of the sample results table
pub fn unknown_headers(recovery: bool, duplicates: bool) -> Vec<&'static str> {
    let mut headers = vec![
        "Sample name",
        "MGA Peak Area",
        "MEG Peak Area",
        "Peak Ratio",
        "Weight (g)",
        "Dilution",
        "Assay (ppb)",
    ];
    if recovery {
        headers.push("Recovery");
    }
    if duplicates {
        headers.push("Average Assay for Duplicates (ppb)");
        if recovery {
            headers.push("Average Recovery for Duplicates");
        }
    }
    headers
}

/// Write a number, or "n/a" when the value is undefined
fn write_optional(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    match (value, format) {
        (Some(v), Some(f)) => sheet.write_number_with_format(row, col, v, f)?,
        (Some(v), None) => sheet.write_number(row, col, v)?,
        (None, _) => sheet.write_string(row, col, NOT_AVAILABLE)?,
    };
    Ok(())
}

/// Lay out the report on a single worksheet
pub fn build_workbook(report: &AssayReport) -> Result<Workbook, ReportError> {
    let percentage = Format::new().set_num_format("0.00%");
    let bold = Format::new().set_bold();
    let passed = Format::new()
        .set_font_color(Color::Green)
        .set_border_color(Color::Green);
    let failed = Format::new()
        .set_font_color(Color::Red)
        .set_border_color(Color::Red);

    let recovery = report.parameters.recovery_enabled();
    let duplicates = report.duplicates.as_ref();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let mut row: u32 = 1;
    sheet.write_string(
        row,
        0,
        format!(
            "Report auto-generated by MGA Feed Assay Processor, Version {}",
            crate::VERSION
        ),
    )?;
    row += 1;
    sheet.write_string(row, 0, report.generated_at.format("%a %b %e %H:%M:%S %Y").to_string())?;
    row += 1;
    sheet.write_string(row, 0, format!("Source: {}", report.source))?;
    row += 1;

    for (col, header) in ["Standard No.", "MGA Peak Area", "MEG Peak Area", "Peak Ratio"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(row, col as u16, *header, &bold)?;
    }
    row += 1;

    for (number, standard) in report.standards().enumerate() {
        sheet.write_number(row, 0, (number + 1) as f64)?;
        sheet.write_number(row, 1, standard.primary_area)?;
        sheet.write_number(row, 2, standard.internal_area)?;
        write_optional(sheet, row, 3, standard.peak_ratio, None)?;
        row += 1;
    }

    let calibration = &report.calibration;
    sheet.write_string(row, 0, "Peak Ratio Mean")?;
    sheet.write_number(row, 1, calibration.mean)?;
    row += 1;
    sheet.write_string(row, 0, "Peak Ratio Stdev")?;
    sheet.write_number(row, 1, calibration.stdev)?;
    row += 1;
    sheet.write_string(row, 0, "Peak Ratio RSD")?;
    sheet.write_number_with_format(row, 1, calibration.rsd, &percentage)?;
    let limit = report.rsd_limit_label();
    if report.calibration_passed() {
        sheet.write_string_with_format(row, 2, format!("RSD <={limit}% Passed!"), &passed)?;
    } else {
        sheet.write_string_with_format(row, 2, format!("RSD >{limit}% Failed!"), &failed)?;
    }
    row += 1;

    sheet.write_string(row, 0, "Std conc. (ppb)")?;
    sheet.write_number(row, 1, report.parameters.standard_concentration)?;
    row += 1;
    if let Some(recovery) = report.parameters.recovery {
        sheet.write_string(row, 0, "Expected potency (ppb)")?;
        sheet.write_number(row, 1, recovery.expected_potency)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Sample results", &bold)?;
    row += 1;
    for (col, header) in unknown_headers(recovery, duplicates.is_some())
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(row, col as u16, *header, &bold)?;
    }
    row += 1;

    for sample in report.unknowns() {
        sheet.write_string(row, 0, sample.name.as_str())?;
        sheet.write_number(row, 1, sample.primary_area)?;
        sheet.write_number(row, 2, sample.internal_area)?;
        write_optional(sheet, row, 3, sample.peak_ratio, None)?;
        sheet.write_number(row, 4, sample.weight)?;
        sheet.write_number(row, 5, sample.dilution)?;
        write_optional(sheet, row, 6, sample.assay, None)?;

        let mut col: u16 = 7;
        if recovery {
            write_optional(sheet, row, col, sample.recovery, Some(&percentage))?;
            col += 1;
        }
        if let Some(group) = duplicates.and_then(|d| d.group_ending_at(&sample.name)) {
            write_optional(sheet, row, col, group.assay, None)?;
            if recovery {
                write_optional(sheet, row, col + 1, group.recovery, Some(&percentage))?;
            }
        }
        row += 1;
    }

    if !report.failures.is_empty() {
        row += 1;
        sheet.write_string_with_format(row, 0, "Calculation errors", &failed)?;
        row += 1;
        for failure in &report.failures {
            sheet.write_string(row, 0, failure.as_str())?;
            row += 1;
        }
    }

    sheet.set_column_width(0, 35)?;
    for col in 1..=7 {
        sheet.set_column_width(col, 18)?;
    }
    sheet.set_column_width(8, 35)?;
    sheet.set_column_width(9, 35)?;

    Ok(workbook)
}

/// Build the workbook and write it to `path`, replacing any existing file.
///
/// The workbook is staged in a temporary file in the destination directory
/// and moved into place once complete, so a failed write never leaves a
/// truncated report behind.
pub fn write_workbook(report: &AssayReport, path: &Path) -> Result<(), ReportError> {
    let mut workbook = build_workbook(report)?;
    let buffer = workbook.save_to_buffer()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(&buffer).map_err(write_error)?;
    staged
        .persist(path)
        .map_err(|err| write_error(err.error))?;

    info!("Report written to {}", path.display());
    Ok(())
}
