//! TOML validation with the `toml` crate.

use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{location_of, read_utf8};

/// Parses the document as a TOML table.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlChecker;

impl Checker for TomlChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Toml
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).and_then(|text| check_toml(&text)).into()
    }
}

fn check_toml(text: &str) -> Result<(), ValidationFailure> {
    ::toml::from_str::<::toml::Table>(text)
        .map(|_| ())
        .map_err(|err| {
            ValidationFailure::syntax(format!("invalid TOML: {}", err.message().trim()))
                .with_location(err.span().map(|span| location_of(text, span.start)))
        })
}
