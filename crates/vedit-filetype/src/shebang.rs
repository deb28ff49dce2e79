//! First-line inspection for interpreter directives.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::type_key::TypeKey;

/// Longest first line read when looking for a directive.
const FIRST_LINE_LIMIT: u64 = 512;

/// Maps the first line of a file to a type key.
///
/// Recognises `#!` directives (direct paths and `/usr/bin/env` forms, with
/// interpreter flags and `env -S`), `<?php` openings and the bare `<?` tag.
#[must_use]
pub fn shebang_type(first_line: &str) -> Option<TypeKey> {
    let line = first_line.trim();
    if line.starts_with("<?php") || line == "<?" {
        return Some(TypeKey::Php);
    }

    let directive = line.strip_prefix("#!")?;
    let mut tokens = directive.split_whitespace();
    let mut interpreter = basename(tokens.next()?);
    if interpreter == "env" {
        interpreter = tokens
            .find(|token| !token.starts_with('-') && !token.contains('='))
            .map(basename)?;
    }
    interpreter_type(interpreter)
}

fn basename(token: &str) -> &str {
    token.rsplit('/').next().unwrap_or(token)
}

fn interpreter_type(name: &str) -> Option<TypeKey> {
    match name {
        "sh" | "bash" | "zsh" | "ksh" | "mksh" | "dash" | "ash" => Some(TypeKey::Shell),
        name if name.starts_with("python") => Some(TypeKey::Python),
        name if name.starts_with("php") => Some(TypeKey::Php),
        _ => None,
    }
}

/// Reads the first line of `path`.
///
/// Returns `Ok(None)` when the line is not valid UTF-8.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be read.
pub fn read_first_line(path: &Path) -> io::Result<Option<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file.take(FIRST_LINE_LIMIT));
    let mut raw = Vec::new();
    reader.read_until(b'\n', &mut raw)?;
    Ok(String::from_utf8(raw).ok())
}
