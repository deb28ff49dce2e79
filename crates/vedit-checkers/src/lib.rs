//! Format checkers and the registry that selects them.
//!
//! Every checker implements [`Checker`]: it receives the path of a staged
//! working copy and returns a [`ValidationOutcome`]. Failures are outcomes
//! rather than errors. A checker whose external tool is missing reports
//! [`FailureKind::ToolUnavailable`], which callers treat as a skip.
//!
//! [`ValidatorRegistry::builtin`] assembles the fixed set of built-in
//! checkers together with their extension aliases.

mod checker;
mod formats;
mod outcome;
mod registry;
mod shellcheck;
mod text;
mod tool;

#[cfg(any(test, feature = "test-support"))]
pub mod doubles;

pub use checker::Checker;
pub use formats::{
    CsvChecker, IniChecker, JsonChecker, PhpChecker, PythonChecker, ReadableTextChecker,
    ShellChecker, TomlChecker, XmlChecker, YamlChecker,
};
pub use outcome::{FailureKind, ValidationFailure, ValidationOutcome};
pub use registry::{RegistryError, ResolvedChecker, ValidatorRegistry};
pub use shellcheck::{
    Advisory, Shellcheck, SupplementaryCheck, SupplementaryReport, parse_checkstyle,
};
pub use tool::{ToolError, ToolOutput, locate, run_tool};
