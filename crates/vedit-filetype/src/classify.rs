//! The detection cascade.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::probe::{
    ContentProbe, FileCommandProbe, MimeClass, SNIFF_LEN, classify_mime, contains_null_byte,
    has_binary_signature, read_head,
};
use crate::shebang::{read_first_line, shebang_type};
use crate::type_key::TypeKey;

const CLASSIFY_TARGET: &str = "vedit_filetype::classify";

/// Which step of the cascade produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// The extension table matched.
    Extension,
    /// The first line carried an interpreter directive.
    Shebang,
    /// A null byte, MIME probe or magic number decided.
    Content,
    /// Nothing matched.
    Default,
}

impl DetectionSource {
    /// Lower-case label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Shebang => "shebang",
            Self::Content => "content",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeClassification {
    key: TypeKey,
    source: DetectionSource,
}

impl TypeClassification {
    /// Builds a classification.
    #[must_use]
    pub const fn new(key: TypeKey, source: DetectionSource) -> Self {
        Self { key, source }
    }

    /// The detected type key.
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// The cascade step that decided.
    #[must_use]
    pub const fn source(&self) -> DetectionSource {
        self.source
    }
}

/// Determines type keys with an extension → directive → content cascade.
///
/// The cascade never fails: unreadable files, absent tools and unknown
/// answers simply advance to the next step, ending at plain text.
#[derive(Debug, Default, Clone)]
pub struct Classifier<P = FileCommandProbe> {
    probe: P,
}

impl Classifier<FileCommandProbe> {
    /// Creates a classifier backed by the `file` utility.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            probe: FileCommandProbe,
        }
    }
}

impl<P: ContentProbe> Classifier<P> {
    /// Creates a classifier backed by a custom content probe.
    #[must_use]
    pub const fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Classifies `path`.
    ///
    /// 1. Extension table.
    /// 2. Paths that are not existing regular files are plain text.
    /// 3. Interpreter directive on the first line.
    /// 4. A null byte within the first 4096 bytes means binary.
    /// 5. MIME probe: mapped types win, other `text/*` is text, the rest
    ///    binary.
    /// 6. Magic numbers of executable and container formats mean binary.
    /// 7. Plain text.
    #[must_use]
    pub fn classify(&self, path: &Path) -> TypeClassification {
        let classification = self.run_cascade(path);
        debug!(
            target: CLASSIFY_TARGET,
            path = %path.display(),
            type_key = %classification.key(),
            source = %classification.source(),
            "classified file"
        );
        classification
    }

    fn run_cascade(&self, path: &Path) -> TypeClassification {
        if let Some(key) = TypeKey::from_path(path) {
            return TypeClassification::new(key, DetectionSource::Extension);
        }

        if !path.is_file() {
            return TypeClassification::new(TypeKey::Text, DetectionSource::Default);
        }

        if let Some(key) = read_first_line(path)
            .ok()
            .flatten()
            .and_then(|line| shebang_type(&line))
        {
            return TypeClassification::new(key, DetectionSource::Shebang);
        }

        let head = read_head(path, SNIFF_LEN).unwrap_or_default();
        if contains_null_byte(&head) {
            return TypeClassification::new(TypeKey::Binary, DetectionSource::Content);
        }

        if let Some(mime) = self.probe.mime_type(path) {
            let key = match classify_mime(&mime) {
                MimeClass::Known(key) => key,
                MimeClass::Text => TypeKey::Text,
                MimeClass::Binary => TypeKey::Binary,
            };
            return TypeClassification::new(key, DetectionSource::Content);
        }

        if has_binary_signature(&head) {
            return TypeClassification::new(TypeKey::Binary, DetectionSource::Content);
        }

        TypeClassification::new(TypeKey::Text, DetectionSource::Default)
    }
}

/// Classifies `path` with the default `file`-backed probe.
#[must_use]
pub fn classify(path: &Path) -> TypeClassification {
    Classifier::new().classify(path)
}
