//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use panier::{ScenarioReport, Step, StepObserver, StepRecord, StepStatus};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

use crate::error::CliResult;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Live step progress on stderr
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            spinner: None,
            use_color,
            quiet,
        }
    }

    fn prefix(&self, symbol: &str, plain: &str, paint: fn(&str) -> String) -> String {
        if self.use_color {
            paint(symbol)
        } else {
            plain.to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("✓", "PASS", |s| style(s).green().bold().to_string());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures print in quiet mode too
        let prefix = self.prefix("✗", "FAIL", |s| style(s).red().bold().to_string());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a skipped step
    pub fn skipped(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("-", "SKIP", |s| style(s).dim().to_string());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("⚠", "WARN", |s| style(s).yellow().bold().to_string());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("ℹ", "INFO", |s| style(s).blue().bold().to_string());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the one-line run summary
    pub fn summary(&self, report: &ScenarioReport) {
        if self.quiet && report.passed {
            return;
        }
        let counts = StepCounts::of(report);
        let secs = Duration::from_millis(report.duration_ms).as_secs_f64();
        let line = if self.use_color {
            let status = if report.passed {
                Style::new().green().bold().apply_to("PASSED")
            } else {
                Style::new().red().bold().apply_to("FAILED")
            };
            format!(
                "{status} {} steps in {secs:.2}s ({} passed, {} failed, {} skipped)",
                counts.total(),
                counts.passed,
                counts.failed,
                counts.skipped
            )
        } else {
            summary_line(report)
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }

    fn start_spinner(&mut self, step: Step) {
        if self.quiet {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(step.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl StepObserver for ProgressReporter {
    fn step_started(&mut self, step: Step) {
        self.start_spinner(step);
    }

    fn step_finished(&mut self, record: &StepRecord) {
        self.clear_spinner();
        let line = record_line(record);
        match record.status {
            StepStatus::Passed => self.success(&line),
            StepStatus::Failed => self.failure(&line),
            StepStatus::Skipped => self.skipped(&line),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StepCounts {
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl StepCounts {
    fn of(report: &ScenarioReport) -> Self {
        report
            .steps
            .iter()
            .fold(Self::default(), |mut counts, record| {
                match record.status {
                    StepStatus::Passed => counts.passed += 1,
                    StepStatus::Failed => counts.failed += 1,
                    StepStatus::Skipped => counts.skipped += 1,
                }
                counts
            })
    }

    const fn total(self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

fn record_line(record: &StepRecord) -> String {
    match (&record.status, &record.error) {
        (StepStatus::Skipped, _) => format!("{} (skipped)", record.step),
        (_, Some(error)) => format!("{} ({}ms): {error}", record.step, record.duration_ms),
        (_, None) => format!("{} ({}ms)", record.step, record.duration_ms),
    }
}

/// Uncolored summary line
#[must_use]
pub fn summary_line(report: &ScenarioReport) -> String {
    let counts = StepCounts::of(report);
    let status = if report.passed { "PASSED" } else { "FAILED" };
    let secs = Duration::from_millis(report.duration_ms).as_secs_f64();
    format!(
        "{status} {} steps in {secs:.2}s ({} passed, {} failed, {} skipped)",
        counts.total(),
        counts.passed,
        counts.failed,
        counts.skipped
    )
}

/// Write the final report
///
/// # Errors
///
/// Returns an error when writing or serializing fails
pub fn write_report(
    out: &mut impl Write,
    report: &ScenarioReport,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{} on {}", report.product, report.url)?;
            for record in &report.steps {
                let status = match record.status {
                    StepStatus::Passed => "PASS",
                    StepStatus::Failed => "FAIL",
                    StepStatus::Skipped => "SKIP",
                };
                writeln!(out, "  {status} {}", record_line(record))?;
            }
            for note in &report.notes {
                writeln!(out, "  note: {note}")?;
            }
            writeln!(out, "{}", summary_line(report))?;
        }
    }
    Ok(())
}

/// Write the step plan
///
/// # Errors
///
/// Returns an error when writing or serializing fails
pub fn write_plan(
    out: &mut impl Write,
    plan: &[(Step, String)],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let steps: Vec<_> = plan
                .iter()
                .map(|(step, action)| {
                    serde_json::json!({
                        "index": step.index(),
                        "step": step,
                        "action": action,
                    })
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &steps)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for (step, action) in plan {
                writeln!(out, "{step}: {action}")?;
            }
        }
    }
    Ok(())
}
