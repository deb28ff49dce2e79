//! Readability check for markup without a structural validator.

use std::path::Path;

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::ValidationOutcome;
use crate::text::read_utf8;

/// Accepts any file that decodes as UTF-8.
///
/// Markdown and HTML are forgiving enough that any readable text renders;
/// only undecodable bytes are rejected.
#[derive(Debug, Clone, Copy)]
pub struct ReadableTextChecker {
    key: TypeKey,
}

impl ReadableTextChecker {
    /// Checker registered under `key`.
    #[must_use]
    pub const fn new(key: TypeKey) -> Self {
        Self { key }
    }
}

impl Checker for ReadableTextChecker {
    fn type_key(&self) -> TypeKey {
        self.key
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        read_utf8(path).map(|_| ()).into()
    }
}
