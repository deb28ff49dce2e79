//! PHP syntax check with `php -l`.

use std::ffi::OsStr;
use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::formats::shell::first_line_or;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::tool::{line_after, run_tool};

/// Asks the PHP interpreter to lint the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpChecker;

impl Checker for PhpChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Php
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        match run_tool("php", [OsStr::new("-l"), path.as_os_str()]) {
            Ok(output) if output.success() => ValidationOutcome::Passed,
            Ok(output) => {
                let diagnostics = output.diagnostics();
                let message = diagnostics
                    .lines()
                    .map(str::trim)
                    .find(|line| line.contains("error"))
                    .map_or_else(|| first_line_or(&diagnostics, "php -l failed"), str::to_owned);
                ValidationOutcome::Failed(
                    ValidationFailure::syntax(message)
                        .with_line(line_after(&diagnostics, "on line ")),
                )
            }
            Err(err) => ValidationOutcome::Failed(err.into_failure()),
        }
    }
}
