//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for check reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use modelguard_schemas::{FailureMode, ValidationError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Outcome of a `check` run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every checked value satisfied the model
    Passed,
    /// At least one value violated the model
    Failed,
    /// Violations were reported as warnings only
    Warned,
    /// Validation was turned off
    Skipped,
}

/// Result of validating a value file against a model file
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub value_file: PathBuf,
    pub model_file: PathBuf,
    pub mode: FailureMode,
    pub outcome: Outcome,
    /// Number of values checked (1, or the array length with `--each`)
    pub checked: usize,
    /// Number of values that violated the model
    pub failed: usize,
    /// Failure details; empty in bool mode, which only reports a flag
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ValidationError>,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a check report
    fn format_check_report(&self, report: &CheckReport, show_violations: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_check_report(&self, report: &CheckReport, show_violations: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_check_report_human(report, show_violations)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            // For machine formats, write as-is
            self.write(&formatted)
        }
    }

    /// Write a check report with specialized formatting
    pub fn check_report(&mut self, report: &CheckReport, show_violations: bool) -> Result<()> {
        // Quiet human output keeps only failures
        if self.quiet && self.format == OutputFormat::Human && report.outcome != Outcome::Failed {
            return Ok(());
        }

        let mut formatted = self.format.format_check_report(report, show_violations)?;
        if self.use_color && self.format == OutputFormat::Human {
            formatted = colorize_report(&formatted, report.outcome);
        }
        self.writeln(formatted.trim_end())
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i < widths.len() {
                        format!("{:width$}", cell, width = widths[i])
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Color the headline of a human report by outcome
fn colorize_report(formatted: &str, outcome: Outcome) -> String {
    let (headline, rest) = formatted.split_once('\n').unwrap_or((formatted, ""));
    let headline = match outcome {
        Outcome::Passed => headline.green().bold(),
        Outcome::Failed => headline.red().bold(),
        Outcome::Warned => headline.yellow().bold(),
        Outcome::Skipped => headline.dimmed(),
    };
    if rest.is_empty() {
        headline.to_string()
    } else {
        format!("{}\n{}", headline, rest)
    }
}

/// Format a check report for human reading
fn format_check_report_human(report: &CheckReport, show_violations: bool) -> String {
    let value_file = report.value_file.display();
    let model_file = report.model_file.display();

    let mut output = match report.outcome {
        Outcome::Passed if report.checked == 1 => format!("✓ {} satisfies {}\n", value_file, model_file),
        Outcome::Passed => format!("✓ All {} value(s) in {} satisfy {}\n", report.checked, value_file, model_file),
        Outcome::Skipped => format!("- Validation of {} is turned off\n", value_file),
        Outcome::Warned => format!(
            "! {} does not satisfy {} ({} warning(s))\n",
            value_file, model_file, report.failed
        ),
        Outcome::Failed => format!(
            "✗ {} does not satisfy {} ({} of {} value(s) failed)\n",
            value_file, model_file, report.failed, report.checked
        ),
    };

    for error in &report.failures {
        output.push('\n');
        output.push_str(&format_validation_error_human(error, show_violations, 1));
    }

    output
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError, show_violations: bool, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut output = String::new();

    output.push_str(&format!("{}• [{}] {}: {}\n", indent, error.code(), error.name, error.message));

    if show_violations {
        for violation in &error.violations {
            output.push_str(&format!("{}    Rule: {}\n", indent, violation.rule));
            output.push_str(&format!("{}    Expected: {}\n", indent, violation.expected));
            output.push_str(&format!("{}    Actual: {}\n", indent, violation.actual));
        }
    }

    for alternative in &error.alternatives {
        output.push_str(&format_validation_error_human(alternative, show_violations, depth + 1));
    }

    output
}
