//! XML well-formedness with `quick-xml`.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{location_of, read_utf8};

/// Requires balanced tags and exactly one root element.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlChecker;

impl Checker for XmlChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Xml
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).and_then(|text| check_xml(&text)).into()
    }
}

fn check_xml(text: &str) -> Result<(), ValidationFailure> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;
    let mut depth = 0_usize;
    let mut roots = 0_usize;

    loop {
        let event = reader.read_event().map_err(|err| {
            located(
                text,
                offset(reader.error_position()),
                format!("malformed XML: {err}"),
            )
        })?;
        let position = offset(reader.buffer_position());
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                    ensure_single_root(text, position, roots)?;
                }
                depth += 1;
            }
            Event::Empty(_) => {
                if depth == 0 {
                    roots += 1;
                    ensure_single_root(text, position, roots)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(content) if depth == 0 => {
                if !content.iter().all(u8::is_ascii_whitespace) {
                    return Err(located(text, position, "text outside the root element"));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(located(text, position, "CDATA outside the root element"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(located(text, text.len(), "unclosed element at end of document"));
    }
    if roots == 0 {
        return Err(ValidationFailure::format("document has no root element"));
    }
    Ok(())
}

fn ensure_single_root(text: &str, position: usize, roots: usize) -> Result<(), ValidationFailure> {
    if roots > 1 {
        return Err(located(text, position, "multiple root elements"));
    }
    Ok(())
}

fn located(text: &str, position: usize, message: impl Into<String>) -> ValidationFailure {
    let (line, column) = location_of(text, position);
    ValidationFailure::syntax(message).at_location(line, column)
}

fn offset(position: u64) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}
