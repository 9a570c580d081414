use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::AssayReport;

fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

impl AssayReport {
    fn sample_lines(&self) -> Vec<String> {
        let recovery = self.parameters.recovery_enabled();
        let mut lines = Vec::new();
        for sample in self.unknowns() {
            let mut line = format!(
                "  {:<30} ratio {:>8}  weight {:>8}  dilution {:>6}  assay {:>10} ppb",
                sample.name,
                optional(sample.peak_ratio, 4),
                sample.weight,
                sample.dilution,
                optional(sample.assay, 2),
            );
            if recovery {
                line.push_str(&format!("  recovery {:>8}", percent(sample.recovery)));
            }
            if let Some(group) = self
                .duplicates
                .as_ref()
                .and_then(|d| d.group_ending_at(&sample.name))
            {
                line.push_str(&format!("  avg {} ppb", optional(group.assay, 2)));
                if recovery {
                    line.push_str(&format!(" / {}", percent(group.recovery)));
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("MGA Feed Assay Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=====================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Source").bold(), self.source));

            output.push_str(&format!("{}\n", style("Calibration").bold()));
            output.push_str(&format!("  {}\n", self.calibration));
            let verdict = if self.calibration_passed() {
                style(format!("RSD within {}% limit", self.rsd_limit_label()))
                    .green()
                    .bold()
            } else {
                style(format!("RSD exceeds {}% limit", self.rsd_limit_label()))
                    .red()
                    .bold()
            };
            output.push_str(&format!("  {}\n", verdict));
            output.push_str(&format!(
                "  Standard concentration: {} ppb\n\n",
                self.parameters.standard_concentration
            ));

            output.push_str(&format!("{}\n", style("Samples").bold()));
            for line in self.sample_lines() {
                output.push_str(&line);
                output.push('\n');
            }

            if !self.failures.is_empty() {
                output.push('\n');
                output.push_str(&format!("{}\n", style("Calculation errors").red().bold()));
                for failure in &self.failures {
                    output.push_str(&format!("  {}\n", style(failure).red()));
                }
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for AssayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MGA Feed Assay Report")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f)?;

        writeln!(f, "Calibration")?;
        writeln!(f, "  {}", self.calibration)?;
        if self.calibration_passed() {
            writeln!(f, "  RSD within {}% limit", self.rsd_limit_label())?;
        } else {
            writeln!(f, "  RSD exceeds {}% limit", self.rsd_limit_label())?;
        }
        writeln!(
            f,
            "  Standard concentration: {} ppb",
            self.parameters.standard_concentration
        )?;
        writeln!(f)?;

        writeln!(f, "Samples")?;
        for line in self.sample_lines() {
            writeln!(f, "{}", line)?;
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Calculation errors")?;
            for failure in &self.failures {
                writeln!(f, "  {}", failure)?;
            }
        }

        Ok(())
    }
}
