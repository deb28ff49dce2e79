//! Helpers shared by in-process checkers.

use std::fs;
use std::path::Path;

use crate::outcome::ValidationFailure;

/// Reads `path` and decodes it as UTF-8.
///
/// # Errors
///
/// Returns an encoding failure, located at the first invalid byte, when the
/// content is not UTF-8, and a format failure when the file cannot be read.
pub fn read_utf8(path: &Path) -> Result<String, ValidationFailure> {
    let bytes = fs::read(path).map_err(|err| {
        ValidationFailure::format(format!("cannot read {}: {err}", path.display()))
    })?;
    String::from_utf8(bytes).map_err(|err| {
        let valid = err.utf8_error().valid_up_to();
        let prefix = String::from_utf8_lossy(err.as_bytes().get(..valid).unwrap_or_default());
        let (line, column) = location_of(&prefix, prefix.len());
        ValidationFailure::encoding(format!("invalid UTF-8 byte at offset {valid}"))
            .at_location(line, column)
    })
}

/// Converts a byte offset into a one-based line and column.
///
/// Columns count characters, not bytes. Offsets past the end clamp to the
/// end of `text`; offsets inside a character round down to its start.
#[must_use]
pub fn location_of(text: &str, offset: usize) -> (u32, u32) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = text.get(..end).unwrap_or_default();
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let column = before.get(line_start..).unwrap_or_default().chars().count() + 1;
    (saturate(line), saturate(column))
}

/// Narrows a count to `u32`, saturating on overflow.
#[must_use]
pub fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
