//! YAML validation.
//!
//! `yamllint` is consulted first when installed. Its verdict is only trusted
//! when it passes: lint rules such as line length would otherwise block
//! valid documents, so any complaint is settled by loading the document
//! with `saphyr`.

use std::ffi::OsStr;
use std::path::Path;

use saphyr::{LoadableYamlNode, Yaml};
use tracing::debug;
use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{read_utf8, saturate};
use crate::tool::run_tool;

const YAML_TARGET: &str = "vedit_checkers::yaml";

/// Validates YAML with `yamllint`, falling back to an in-process load.
#[derive(Debug, Clone, Copy)]
pub struct YamlChecker {
    use_yamllint: bool,
}

impl YamlChecker {
    /// Checker that consults `yamllint` when available.
    #[must_use]
    pub const fn new() -> Self {
        Self { use_yamllint: true }
    }

    /// Checker that only performs the in-process load.
    #[must_use]
    pub const fn in_process() -> Self {
        Self {
            use_yamllint: false,
        }
    }
}

impl Default for YamlChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker for YamlChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Yaml
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        if self.use_yamllint {
            match run_tool(
                "yamllint",
                [OsStr::new("-f"), OsStr::new("parsable"), path.as_os_str()],
            ) {
                Ok(output) if output.success() => return ValidationOutcome::Passed,
                Ok(output) => debug!(
                    target: YAML_TARGET,
                    diagnostics = %output.diagnostics(),
                    "yamllint complained; loading in process"
                ),
                Err(err) => debug!(
                    target: YAML_TARGET,
                    error = %err,
                    "yamllint unavailable; loading in process"
                ),
            }
        }
        read_utf8(path).and_then(|text| load_yaml(&text)).into()
    }
}

fn load_yaml(text: &str) -> Result<(), ValidationFailure> {
    Yaml::load_from_str(text).map(|_| ()).map_err(|err| {
        let marker = err.marker();
        ValidationFailure::syntax(format!("invalid YAML: {}", err.info()))
            .at_location(saturate(marker.line()), saturate(marker.col() + 1))
    })
}
