//! Command-line arguments for `vedit`.

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use vedit_checkers::ValidatorRegistry;

/// Edit a file, check its format, and replace it atomically.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "vedit", version)]
pub(crate) struct Cli {
    /// Skips format checking and commits whatever the editor leaves.
    #[arg(short = 'n', long = "no-validate")]
    pub(crate) no_validate: bool,
    /// Opens the editor at this line on the first edit.
    #[arg(short = 'l', long = "line", value_name = "N",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) line: Option<u32>,
    /// Runs shellcheck on shell scripts that pass validation.
    #[arg(short = 's', long = "shellcheck")]
    pub(crate) shellcheck: bool,
    /// File to edit; created on confirmation when missing.
    #[arg(value_name = "FILENAME")]
    pub(crate) filename: Option<String>,
}

impl Cli {
    /// Parses `args`, with the checker listing in `--help`.
    pub(crate) fn try_parse_with_listing<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches: ArgMatches = command().try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    pub(crate) const fn validate(&self) -> bool {
        !self.no_validate
    }
}

/// The clap command with the checker listing appended to the help text.
pub(crate) fn command() -> clap::Command {
    Cli::command().after_help(checker_listing())
}

/// One line per checker: its type key, then the extensions mapped to it.
pub(crate) fn checker_listing() -> String {
    let Ok(registry) = ValidatorRegistry::builtin() else {
        return String::new();
    };
    let mut listing = String::from("Checkers (type: extensions):\n");
    for key in registry.keys() {
        let aliases: Vec<&str> = registry.aliases_for(key).collect();
        listing.push_str(&format!("  {:<9} {}\n", key.as_str(), aliases.join(", ")));
    }
    listing
}
