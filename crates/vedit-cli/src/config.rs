//! Configuration loading for the `vedit` binary.
//!
//! Configuration flags come first on the command line. They are split off
//! and handed to `ortho-config`; the rest goes to the `vedit` parser.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig;
use vedit_config::Config;

use crate::errors::AppError;

/// Flags understood by the configuration loader.
///
/// Keep in step with the fields of [`Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--editor",
    "--log-filter",
    "--log-format",
    "--shellcheck-severity",
    "--shellcheck-shell",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the split-off configuration arguments.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

/// Layers defaults, file, environment and flags through `ortho-config`.
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Skip;
    }
    let (flag, inline) = text
        .split_once('=')
        .map_or((text.as_ref(), false), |(flag, _)| (flag, true));
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline,
        }
    } else {
        FlagAction::Skip
    }
}

/// Arguments for the configuration loader, and where the rest begin.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

/// Splits leading configuration flags from `args`.
///
/// Both halves keep the program name in front.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut pending_value = false;
    for argument in rest {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match classify_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Skip => break,
        }
    }

    let command_start = config_arguments.len();
    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}

/// Program name followed by everything after the configuration flags.
pub(crate) fn command_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.get(split.command_start..).unwrap_or_default())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case("--editor", FlagAction::Include { needs_value: true })]
    #[case("--shellcheck", FlagAction::Skip)]
    #[case("-n", FlagAction::Skip)]
    #[case("notes.txt", FlagAction::Skip)]
    fn flags_are_classified(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(classify_flag(OsStr::new(argument)), expected);
    }

    #[test]
    fn leading_config_flags_are_split_off() {
        let args = os(&[
            "vedit",
            "--editor",
            "nano -w",
            "--log-format=json",
            "-l",
            "3",
            "notes.txt",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os(&["vedit", "--editor", "nano -w", "--log-format=json"])
        );
        assert_eq!(
            command_arguments(&args, &split),
            os(&["vedit", "-l", "3", "notes.txt"])
        );
    }

    #[test]
    fn config_flags_after_the_filename_stay_with_the_command() {
        let args = os(&["vedit", "notes.txt", "--editor", "nano"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os(&["vedit"]));
        assert_eq!(command_arguments(&args, &split), args);
    }

    #[test]
    fn empty_arguments_split_to_nothing() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(command_arguments(&[], &split).is_empty());
    }

    #[test]
    fn loader_applies_split_off_flags() {
        let args = os(&["vedit", "--log-filter", "vedit=debug", "notes.txt"]);
        let split = split_config_arguments(&args);
        let config = OrthoConfigLoader
            .load(&split.config_arguments)
            .expect("configuration loads");
        assert_eq!(config.log_filter(), "vedit=debug");
    }

    #[test]
    fn dangling_value_flag_is_kept_for_the_loader() {
        let args = os(&["vedit", "--editor"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, args);
        assert_eq!(command_arguments(&args, &split), os(&["vedit"]));
    }
}
