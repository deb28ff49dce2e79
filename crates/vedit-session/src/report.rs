//! User-facing progress messages.
//!
//! Reporting is separate from logging: these lines are meant for the person
//! at the terminal, whatever the log filter says.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;
use vedit_checkers::{SupplementaryReport, ValidationFailure};
use vedit_filetype::TypeKey;

const REPORT_TARGET: &str = "vedit_session::report";

/// Why a session ended without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The user chose to quit after a failed validation.
    UserQuit,
    /// A termination signal arrived.
    Interrupted,
}

/// Something worth telling the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The checker accepted the working copy.
    ValidationPassed {
        /// Checker's type key.
        key: TypeKey,
    },
    /// The checker could not run; treated as a pass.
    ValidationSkipped {
        /// Checker's type key.
        key: TypeKey,
        /// Why it could not run.
        failure: ValidationFailure,
    },
    /// The checker rejected the working copy.
    ValidationFailed {
        /// Checker's type key.
        key: TypeKey,
        /// What was wrong.
        failure: ValidationFailure,
    },
    /// Advisory analysis results.
    Advisories(SupplementaryReport),
    /// The target was replaced.
    Committed {
        /// Target path.
        path: PathBuf,
    },
    /// The session ended without touching the target.
    Aborted {
        /// Target path.
        path: PathBuf,
        /// Why the session ended.
        reason: AbortReason,
    },
}

/// Receives session events.
pub trait Reporter {
    /// Handles one event.
    fn report(&mut self, event: &SessionEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _event: &SessionEvent) {}
}

/// Writes events as plain text lines.
#[derive(Debug)]
pub struct StreamReporter<W> {
    output: W,
}

impl<W: Write> StreamReporter<W> {
    /// Reporter writing to `output`.
    #[must_use]
    pub const fn new(output: W) -> Self {
        Self { output }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Reporter for StreamReporter<W> {
    fn report(&mut self, event: &SessionEvent) {
        let text = render(event);
        if let Err(err) = self.output.write_all(text.as_bytes()) {
            debug!(target: REPORT_TARGET, error = %err, "report could not be written");
        }
    }
}

/// Renders `event` as one or more newline-terminated lines.
#[must_use]
pub fn render(event: &SessionEvent) -> String {
    match event {
        SessionEvent::ValidationPassed { key } => format!("{key} validation passed.\n"),
        SessionEvent::ValidationSkipped { key, failure } => {
            format!("{key} validation skipped: {}\n", failure.message())
        }
        SessionEvent::ValidationFailed { key, failure } => {
            let mut text = format!("{key} validation failed ({}): {}", failure.kind(), failure.message());
            match (failure.line(), failure.column()) {
                (Some(line), Some(column)) => text.push_str(&format!(" [line {line}, column {column}]")),
                (Some(line), None) => text.push_str(&format!(" [line {line}]")),
                _ => {}
            }
            text.push('\n');
            text
        }
        SessionEvent::Advisories(report) => render_advisories(report),
        SessionEvent::Committed { path } => format!("Saved {}.\n", path.display()),
        SessionEvent::Aborted { path, reason } => match reason {
            AbortReason::UserQuit => format!("Discarded changes; {} is unchanged.\n", path.display()),
            AbortReason::Interrupted => {
                format!("Interrupted; {} is unchanged.\n", path.display())
            }
        },
    }
}

fn render_advisories(report: &SupplementaryReport) -> String {
    match report {
        SupplementaryReport::Unavailable(reason) => format!("shellcheck note: {reason}\n"),
        SupplementaryReport::Findings(advisories) if advisories.is_empty() => {
            String::from("shellcheck: no issues found.\n")
        }
        SupplementaryReport::Findings(advisories) => {
            let mut text = format!("shellcheck: {} issue(s) found\n", advisories.len());
            for advisory in advisories {
                text.push_str(&format!("  {advisory}\n"));
            }
            if let Some(line) = report.first_line() {
                text.push_str(&format!("First issue on line {line}.\n"));
            }
            text
        }
    }
}
