//! Per-request result records and their console rendering.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::style::{Color, Stylize};

use crate::args::HttpMethod;
use crate::http::Payload;
use crate::scenario::RequestSpec;

/// Status codes rendered as a success.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];
/// Response previews are cut to this many characters.
pub const PREVIEW_MAX_CHARS: usize = 150;
/// Elapsed times above this render in the slow color.
pub const SLOW_THRESHOLD: Duration = Duration::from_millis(1000);

/// How a single request ended. Local faults (transport, decoding) are kept
/// distinct from HTTP statuses instead of being folded into a synthetic 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Status(u16),
    Failed(String),
}

impl CaseOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            CaseOutcome::Status(status) => SUCCESS_STATUSES.contains(status),
            CaseOutcome::Failed(_) => false,
        }
    }
}

/// Outcome summary for one executed descriptor. Never mutated after creation;
/// exactly one is produced per descriptor, success or not.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub method: HttpMethod,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

impl CaseReport {
    #[must_use]
    pub fn new(spec: &RequestSpec, outcome: CaseOutcome, elapsed: Duration) -> Self {
        CaseReport {
            timestamp: Utc::now(),
            endpoint: spec.path.clone(),
            method: spec.method,
            outcome,
            elapsed,
        }
    }
}

/// Renders a duration as fractional milliseconds with two decimals.
#[must_use]
pub fn format_elapsed_ms(elapsed: Duration) -> String {
    let micros = elapsed.as_micros();
    format!("{}.{:02}", micros / 1000, (micros % 1000) / 10)
}

/// Cuts a rendered payload to [`PREVIEW_MAX_CHARS`] characters, marking the
/// cut with a trailing ellipsis. Shorter payloads pass through verbatim.
#[must_use]
pub fn truncate_preview(rendered: &str) -> String {
    if rendered.chars().count() > PREVIEW_MAX_CHARS {
        let cut: String = rendered.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        rendered.to_owned()
    }
}

#[must_use]
pub fn render_payload(payload: &Payload) -> String {
    match payload {
        Payload::Json(value) => value.to_string(),
        Payload::Text(text) => text.clone(),
    }
}

/// Writes the interactive report lines. Color is cosmetic only and is dropped
/// when stdout is not a terminal or `--no-color` was given.
#[derive(Debug, Clone)]
pub struct Reporter {
    use_color: bool,
}

impl Reporter {
    #[must_use]
    pub fn new(no_color: bool) -> Self {
        Reporter {
            use_color: !no_color && std::io::stdout().is_terminal(),
        }
    }

    pub fn case_line(&self, report: &CaseReport) {
        let status = match &report.outcome {
            CaseOutcome::Status(status) => format!("Status: {}", status),
            CaseOutcome::Failed(message) => format!("Error: {}", message),
        };
        let status_color = if report.outcome.is_success() {
            Color::Green
        } else {
            Color::Red
        };
        let elapsed = format!("Time: {}ms", format_elapsed_ms(report.elapsed));
        let elapsed_color = if report.elapsed > SLOW_THRESHOLD {
            Color::Yellow
        } else {
            Color::Green
        };
        println!(
            "{} {} - {}, {}",
            report.method,
            report.endpoint,
            self.paint(&status, status_color),
            self.paint(&elapsed, elapsed_color)
        );
    }

    pub fn preview(&self, payload: &Payload) {
        println!("Response: {}", truncate_preview(&render_payload(payload)));
    }

    pub fn abort(&self, message: &str) {
        println!("{}", self.paint(message, Color::Red));
    }

    pub fn note(&self, message: &str) {
        println!("{}", message);
    }

    pub fn summary(&self, reports: &[CaseReport]) {
        let passed = reports
            .iter()
            .filter(|report| report.outcome.is_success())
            .count();
        let failed = reports.len().saturating_sub(passed);
        let total = reports
            .iter()
            .fold(Duration::ZERO, |acc, report| acc.saturating_add(report.elapsed));
        let line = format!(
            "Summary: {} passed, {} failed, {} total in {}ms",
            passed,
            failed,
            reports.len(),
            format_elapsed_ms(total)
        );
        let color = if failed == 0 { Color::Green } else { Color::Red };
        println!();
        println!("{}", self.paint(&line, color));
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.with(color).to_string()
        } else {
            text.to_owned()
        }
    }
}
