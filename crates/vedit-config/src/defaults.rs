//! Default values shared by the configuration loader and its callers.

use crate::logging::LogFormat;

/// Default log filter expression.
///
/// The tool is interactive, so only warnings and errors reach the terminal
/// unless the operator asks for more.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default minimum severity reported by the supplementary shell analysis.
pub const DEFAULT_SHELLCHECK_SEVERITY: &str = "style";

/// Default shell dialect assumed by the supplementary shell analysis.
pub const DEFAULT_SHELLCHECK_SHELL: &str = "bash";

/// Severities accepted by the supplementary shell analysis.
pub const SHELLCHECK_SEVERITIES: &[&str] = &["style", "info", "warning", "error"];

/// Shell dialects accepted by the supplementary shell analysis.
pub const SHELLCHECK_SHELLS: &[&str] = &["bash", "sh", "dash", "ksh"];

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Owned default severity for serde.
#[must_use]
pub fn default_shellcheck_severity() -> String {
    DEFAULT_SHELLCHECK_SEVERITY.to_owned()
}

/// Owned default shell dialect for serde.
#[must_use]
pub fn default_shellcheck_shell() -> String {
    DEFAULT_SHELLCHECK_SHELL.to_owned()
}
