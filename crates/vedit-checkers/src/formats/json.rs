//! JSON validation with `serde_json`.

use std::path::Path;

use serde::de::IgnoredAny;
use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{read_utf8, saturate};

/// Parses the whole document without building a value tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonChecker;

impl Checker for JsonChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Json
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).and_then(|text| check_json(&text)).into()
    }
}

fn check_json(text: &str) -> Result<(), ValidationFailure> {
    let body = text.strip_prefix('\u{feff}').unwrap_or(text);
    serde_json::from_str::<IgnoredAny>(body)
        .map(|_| ())
        .map_err(|err| {
            let (line, column) = (err.line(), err.column());
            let rendered = err.to_string();
            let suffix = format!(" at line {line} column {column}");
            let message = rendered.strip_suffix(&suffix).unwrap_or(&rendered);
            ValidationFailure::syntax(format!("invalid JSON: {message}"))
                .at_location(saturate(line), saturate(column))
        })
}
