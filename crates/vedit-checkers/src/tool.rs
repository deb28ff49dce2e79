//! Runs external interpreters and linters.
//!
//! Tools are located on `PATH` with [`which`]. Standard input is closed so a
//! tool can never wait on the terminal, and both output streams are
//! captured for diagnostics.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::outcome::{FailureKind, ValidationFailure};

const TOOL_TARGET: &str = "vedit_checkers::tool";

/// Errors raised before a tool produces any output.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// The executable is not on `PATH`.
    #[error("'{tool}' was not found on PATH")]
    NotFound {
        /// Executable name that was looked up.
        tool: String,
    },
    /// The executable was found but could not be started.
    #[error("'{tool}' failed to start: {source}")]
    Spawn {
        /// Executable name.
        tool: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ToolError {
    /// Converts the error into a skip outcome for the named tool.
    #[must_use]
    pub fn into_failure(self) -> ValidationFailure {
        ValidationFailure::new(FailureKind::ToolUnavailable, self.to_string())
    }
}

/// Captured result of a finished tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

impl ToolOutput {
    /// Returns true when the tool exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Standard output, lossily decoded.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Standard error, lossily decoded.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Both streams joined, stderr first, trimmed.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        let mut text = String::new();
        for stream in [self.stderr.trim(), self.stdout.trim()] {
            if stream.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stream);
        }
        text
    }
}

/// Locates `tool` on `PATH`.
///
/// # Errors
///
/// Returns [`ToolError::NotFound`] when no executable matches.
pub fn locate(tool: &str) -> Result<PathBuf, ToolError> {
    which::which(tool).map_err(|_| ToolError::NotFound {
        tool: tool.to_owned(),
    })
}

/// Runs `tool` with `args` and waits for it to finish.
///
/// # Errors
///
/// Returns [`ToolError`] if the tool is missing or cannot be started.
pub fn run_tool<I, S>(tool: &str, args: I) -> Result<ToolOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = locate(tool)?;
    debug!(
        target: TOOL_TARGET,
        tool,
        program = %program.display(),
        "running external checker"
    );
    let output = Command::new(&program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ToolError::Spawn {
            tool: tool.to_owned(),
            source: Arc::new(source),
        })?;
    debug!(
        target: TOOL_TARGET,
        tool,
        status = ?output.status.code(),
        "external checker finished"
    );
    Ok(ToolOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Finds the first number following `marker` in `text`.
///
/// `bash -n` writes `line 3:` and `php -l` writes `on line 3`; both are
/// matched by passing the word before the number.
#[must_use]
pub fn line_after(text: &str, marker: &str) -> Option<u32> {
    text.match_indices(marker).find_map(|(index, _)| {
        let rest = text.get(index + marker.len()..)?;
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    })
}
