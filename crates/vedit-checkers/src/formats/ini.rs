//! INI grammar check.
//!
//! Follows the strict reading used by common INI parsers: every key lives
//! under a section header, keys are case-insensitive, and neither sections
//! nor keys within a section may repeat. Indented lines continue the value
//! of the preceding key.

use std::collections::HashSet;
use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{read_utf8, saturate};

/// Validates INI-style configuration files.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniChecker;

impl Checker for IniChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Ini
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).and_then(|text| check_ini(&text)).into()
    }
}

#[derive(Default)]
struct Section {
    keys: HashSet<String>,
}

fn check_ini(text: &str) -> Result<(), ValidationFailure> {
    let mut sections = HashSet::new();
    let mut current: Option<Section> = None;
    let mut in_value = false;

    for (index, raw) in text.lines().enumerate() {
        let line_number = saturate(index + 1);
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            in_value = false;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if in_value && line.starts_with([' ', '\t']) {
            continue;
        }

        if let Some(name) = section_name(trimmed) {
            if !sections.insert(name.to_owned()) {
                return Err(ValidationFailure::format(format!(
                    "section '{name}' already exists"
                ))
                .at_line(line_number));
            }
            current = Some(Section::default());
            in_value = false;
            continue;
        }

        let Some(section) = current.as_mut() else {
            return Err(ValidationFailure::format("file contains no section headers")
                .at_line(line_number));
        };

        let Some(key) = option_name(trimmed) else {
            return Err(
                ValidationFailure::syntax(format!("cannot parse line: '{trimmed}'"))
                    .at_line(line_number),
            );
        };
        if !section.keys.insert(key.to_lowercase()) {
            return Err(ValidationFailure::format(format!(
                "option '{key}' already exists in this section"
            ))
            .at_line(line_number));
        }
        in_value = true;
    }
    Ok(())
}

fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Key of a `key = value` or `key: value` line, whichever delimiter
/// appears first.
fn option_name(line: &str) -> Option<&str> {
    let delimiter = line.find(['=', ':'])?;
    let key = line.get(..delimiter)?.trim();
    (!key.is_empty()).then_some(key)
}
