//! Progress sinks for the CLI front-end.
//!
//! The console sink renders one line per outcome under an indicatif bar; the
//! JSON sink emits one JSON object per line for GUI or script consumption,
//! suppressing all human-readable output.

use std::sync::OnceLock;

use console::style;
use indicatif::ProgressBar;
use serde::Serialize;

use crate::conversion::{ConversionReport, Outcome, OutcomeKind, ProgressSink};
use crate::utils::{create_progress_bar, format_bytes};

/// Human-readable renderer: a progress bar plus one styled line per file.
#[derive(Default)]
pub struct ConsoleSink {
    bar: OnceLock<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_line(outcome: &Outcome) -> String {
        match &outcome.kind {
            OutcomeKind::Converted {
                dest,
                bytes_written,
            } => format!(
                "{} {} -> {} ({})",
                style("✓ Converted:").green(),
                outcome.source.display(),
                dest.display(),
                format_bytes(*bytes_written)
            ),
            OutcomeKind::Failed { kind, message } => format!(
                "{} {} ({}: {})",
                style("✗ Failed:").red().bold(),
                outcome.source.display(),
                kind,
                message
            ),
            OutcomeKind::Skipped { reason } => format!(
                "{} {} ({})",
                style("- Skipped:").yellow(),
                outcome.source.display(),
                reason
            ),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn on_start(&self, total: usize) {
        let _ = self.bar.set(create_progress_bar(total as u64));
    }

    fn on_outcome(&self, outcome: &Outcome) {
        let line = Self::render_line(outcome);
        match self.bar.get() {
            Some(bar) => {
                // println through the bar so the line does not tear it.
                bar.println(line);
                bar.inc(1);
            }
            None => println!("{}", line),
        }
    }

    fn on_finish(&self, _report: &ConversionReport) {
        if let Some(bar) = self.bar.get() {
            bar.finish_and_clear();
        }
    }
}

/// Messages emitted by the JSON-lines progress mode.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Run started, item count known.
    Start { total: usize },
    /// One work item finished.
    Outcome {
        source: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        dest: Option<String>,
        status: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bytes_written: Option<u64>,
    },
    /// Run finished.
    Summary {
        total: usize,
        converted: usize,
        failed: usize,
        skipped: usize,
        bytes_written: u64,
    },
}

impl JsonMessage {
    fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    fn from_outcome(outcome: &Outcome) -> Self {
        let (dest, detail, bytes_written) = match &outcome.kind {
            OutcomeKind::Converted {
                dest,
                bytes_written,
            } => (
                Some(dest.display().to_string()),
                None,
                Some(*bytes_written),
            ),
            OutcomeKind::Failed { kind, message } => {
                (None, Some(format!("{}: {}", kind, message)), None)
            }
            OutcomeKind::Skipped { reason } => (None, Some(reason.to_string()), None),
        };
        Self::Outcome {
            source: outcome.source.display().to_string(),
            dest,
            status: outcome.tag(),
            detail,
            bytes_written,
        }
    }
}

/// Machine-readable renderer: one JSON object per line on stdout.
#[derive(Default)]
pub struct JsonSink;

impl JsonSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for JsonSink {
    fn on_start(&self, total: usize) {
        JsonMessage::Start { total }.emit();
    }

    fn on_outcome(&self, outcome: &Outcome) {
        JsonMessage::from_outcome(outcome).emit();
    }

    fn on_finish(&self, report: &ConversionReport) {
        JsonMessage::Summary {
            total: report.total(),
            converted: report.converted(),
            failed: report.failed(),
            skipped: report.skipped(),
            bytes_written: report.bytes_written(),
        }
        .emit();
    }
}
