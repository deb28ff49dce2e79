//! Shell syntax check with `bash -n`.

use std::ffi::OsStr;
use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::tool::{line_after, run_tool};

/// Asks `bash` to parse the script without running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellChecker;

impl Checker for ShellChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Shell
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        match run_tool("bash", [OsStr::new("-n"), path.as_os_str()]) {
            Ok(output) if output.success() => ValidationOutcome::Passed,
            Ok(output) => {
                let diagnostics = output.diagnostics();
                ValidationOutcome::Failed(
                    ValidationFailure::syntax(first_line_or(&diagnostics, "bash -n failed"))
                        .with_line(line_after(&diagnostics, "line ")),
                )
            }
            Err(err) => ValidationOutcome::Failed(err.into_failure()),
        }
    }
}

/// First non-empty diagnostic line, or `fallback` when there is none.
pub(crate) fn first_line_or(diagnostics: &str, fallback: &str) -> String {
    diagnostics
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}
