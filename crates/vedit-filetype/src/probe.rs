//! Content probes used once extension and directive checks are exhausted.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::type_key::TypeKey;

/// Number of leading bytes inspected for null bytes.
pub const SNIFF_LEN: usize = 4096;

const PROBE_TARGET: &str = "vedit_filetype::probe";

/// Magic numbers of common executable and container formats.
const BINARY_SIGNATURES: &[&[u8]] = &[
    b"\x7fELF",
    b"MZ",
    b"\xfe\xed\xfa\xce",
    b"\xfe\xed\xfa\xcf",
    b"\xce\xfa\xed\xfe",
    b"\xcf\xfa\xed\xfe",
    b"\xca\xfe\xba\xbe",
    b"\x89PNG",
    b"GIF8",
    b"\xff\xd8\xff",
    b"PK\x03\x04",
    b"\x1f\x8b",
];

/// MIME types mapped directly to a type key.
const MIME_TYPES: &[(&str, TypeKey)] = &[
    ("text/x-shellscript", TypeKey::Shell),
    ("application/x-shellscript", TypeKey::Shell),
    ("text/x-python", TypeKey::Python),
    ("text/x-script.python", TypeKey::Python),
    ("text/x-php", TypeKey::Php),
    ("text/x-c", TypeKey::C),
    ("application/json", TypeKey::Json),
    ("text/xml", TypeKey::Xml),
    ("application/xml", TypeKey::Xml),
    ("image/svg+xml", TypeKey::Xml),
    ("text/html", TypeKey::Html),
    ("text/csv", TypeKey::Csv),
];

/// Reads up to `limit` leading bytes of `path`.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be read.
pub fn read_head(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(limit);
    file.take(u64::try_from(limit).unwrap_or(u64::MAX))
        .read_to_end(&mut head)?;
    Ok(head)
}

/// Returns true when `head` contains a null byte.
#[must_use]
pub fn contains_null_byte(head: &[u8]) -> bool {
    head.contains(&0)
}

/// Returns true when `head` opens with a known binary magic number.
#[must_use]
pub fn has_binary_signature(head: &[u8]) -> bool {
    BINARY_SIGNATURES
        .iter()
        .any(|signature| head.starts_with(signature))
}

/// What a MIME type says about a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeClass {
    /// The MIME type maps to a specific key.
    Known(TypeKey),
    /// Some other `text/*` type.
    Text,
    /// Any other non-text type.
    Binary,
}

/// Classifies a MIME type string such as `text/x-shellscript`.
#[must_use]
pub fn classify_mime(mime: &str) -> MimeClass {
    let mime = mime.trim();
    if let Some((_, key)) = MIME_TYPES.iter().find(|(candidate, _)| *candidate == mime) {
        return MimeClass::Known(*key);
    }
    if mime.starts_with("text/") || mime == "inode/x-empty" {
        MimeClass::Text
    } else {
        MimeClass::Binary
    }
}

/// Source of MIME types for files the cheaper checks cannot place.
pub trait ContentProbe {
    /// Returns the MIME type of `path`, or `None` when the probe is unavailable.
    fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Probe backed by the `file` utility.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCommandProbe;

impl ContentProbe for FileCommandProbe {
    fn mime_type(&self, path: &Path) -> Option<String> {
        let program = which::which("file").ok()?;
        let output = Command::new(program)
            .args(["-b", "--mime-type"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            debug!(
                target: PROBE_TARGET,
                path = %path.display(),
                status = %output.status,
                "content-type probe failed"
            );
            return None;
        }
        let mime = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        (!mime.is_empty()).then_some(mime)
    }
}

/// Probe that never answers; classification falls through to signatures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContentProbe;

impl ContentProbe for NoContentProbe {
    fn mime_type(&self, _path: &Path) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text/x-shellscript", MimeClass::Known(TypeKey::Shell))]
    #[case("text/x-script.python", MimeClass::Known(TypeKey::Python))]
    #[case("application/json\n", MimeClass::Known(TypeKey::Json))]
    #[case("text/plain", MimeClass::Text)]
    #[case("text/x-makefile", MimeClass::Text)]
    #[case("inode/x-empty", MimeClass::Text)]
    #[case("application/x-executable", MimeClass::Binary)]
    #[case("image/png", MimeClass::Binary)]
    fn mime_types_map_through_table(#[case] mime: &str, #[case] expected: MimeClass) {
        assert_eq!(classify_mime(mime), expected);
    }

    #[rstest]
    #[case(b"\x7fELF\x02\x01", true)]
    #[case(b"MZ\x90\x00", true)]
    #[case(b"\x89PNG\r\n", true)]
    #[case(b"#!/bin/sh", false)]
    #[case(b"", false)]
    fn detects_binary_signatures(#[case] head: &[u8], #[case] expected: bool) {
        assert_eq!(has_binary_signature(head), expected);
    }

    #[test]
    fn read_head_stops_at_limit() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("big");
        std::fs::write(&path, vec![b'a'; SNIFF_LEN * 2]).expect("write");

        let head = read_head(&path, SNIFF_LEN).expect("read");
        assert_eq!(head.len(), SNIFF_LEN);
    }

    #[test]
    fn null_byte_past_limit_is_not_seen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("late-null");
        let mut bytes = vec![b'a'; 2000];
        bytes.push(0);
        std::fs::write(&path, &bytes).expect("write");

        assert!(!contains_null_byte(&read_head(&path, 1024).expect("read")));
        assert!(contains_null_byte(&read_head(&path, SNIFF_LEN).expect("read")));
    }
}
