//! Shared configuration for the `vedit` toolchain.
//!
//! Values are layered by `ortho-config`: built-in defaults, then an optional
//! TOML file selected with `--config-path` or `VEDIT_CONFIG_PATH`, then
//! `VEDIT_*` environment variables, then command-line flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SHELLCHECK_SEVERITY, DEFAULT_SHELLCHECK_SHELL,
    SHELLCHECK_SEVERITIES, SHELLCHECK_SHELLS, default_log_filter, default_log_filter_string,
    default_log_format, default_shellcheck_severity, default_shellcheck_shell,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration resolved before an edit session starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "VEDIT")]
pub struct Config {
    /// Editor command preferred over `EDITOR` and the built-in fallbacks.
    #[serde(default)]
    pub editor: Option<String>,
    /// Tracing filter expression applied to diagnostic logging.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for diagnostic logging.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Minimum severity reported by the supplementary shell analysis.
    #[serde(default = "default_shellcheck_severity")]
    pub shellcheck_severity: String,
    /// Shell dialect assumed by the supplementary shell analysis.
    #[serde(default = "default_shellcheck_shell")]
    pub shellcheck_shell: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            shellcheck_severity: default_shellcheck_severity(),
            shellcheck_shell: default_shellcheck_shell(),
        }
    }
}

impl Config {
    /// Editor command configured explicitly, ignoring blank values.
    #[must_use]
    pub fn editor(&self) -> Option<&str> {
        self.editor
            .as_deref()
            .map(str::trim)
            .filter(|editor| !editor.is_empty())
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Diagnostic log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Minimum severity for the supplementary shell analysis.
    #[must_use]
    pub fn shellcheck_severity(&self) -> &str {
        &self.shellcheck_severity
    }

    /// Shell dialect for the supplementary shell analysis.
    #[must_use]
    pub fn shellcheck_shell(&self) -> &str {
        &self.shellcheck_shell
    }

    /// Rejects values that the external tools would not accept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SHELLCHECK_SEVERITIES.contains(&self.shellcheck_severity.as_str()) {
            return Err(ConfigError::UnsupportedValue {
                field: "shellcheck_severity",
                value: self.shellcheck_severity.clone(),
                expected: SHELLCHECK_SEVERITIES.join(", "),
            });
        }
        if !SHELLCHECK_SHELLS.contains(&self.shellcheck_shell.as_str()) {
            return Err(ConfigError::UnsupportedValue {
                field: "shellcheck_shell",
                value: self.shellcheck_shell.clone(),
                expected: SHELLCHECK_SHELLS.join(", "),
            });
        }
        Ok(())
    }
}

/// Errors raised when a loaded configuration holds unusable values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value outside its accepted set.
    #[error("unsupported {field} '{value}' (expected one of: {expected})")]
    UnsupportedValue {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: String,
        /// Comma-separated accepted values.
        expected: String,
    },
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_suit_interactive_use() {
        let config = Config::default();
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.shellcheck_severity(), "style");
        assert_eq!(config.shellcheck_shell(), "bash");
        assert!(config.editor().is_none());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some(""), None)]
    #[case(Some(" nano "), Some("nano"))]
    #[case(None, None)]
    fn editor_ignores_blank_values(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let config = Config {
            editor: raw.map(str::to_owned),
            ..Config::default()
        };
        assert_eq!(config.editor(), expected);
    }

    #[test]
    fn validate_rejects_unknown_severity() {
        let config = Config {
            shellcheck_severity: String::from("fatal"),
            ..Config::default()
        };
        let error = config.validate().expect_err("severity must be rejected");
        assert!(error.to_string().contains("shellcheck_severity"));
    }

    #[test]
    fn validate_rejects_unknown_shell() {
        let config = Config {
            shellcheck_shell: String::from("fish"),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedValue {
                field: "shellcheck_shell",
                ..
            })
        ));
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("COMPACT", LogFormat::Compact)]
    fn log_format_parses_case_insensitively(#[case] input: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_str(input), Ok(expected));
    }
}
