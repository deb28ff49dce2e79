//! Canonical type keys and the static extension table.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Canonical tag identifying a file's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKey {
    /// Shell scripts (`sh`, `bash`, `zsh`, `ksh`).
    Shell,
    /// Python sources.
    Python,
    /// PHP sources.
    Php,
    /// C sources and headers.
    C,
    /// JSON documents.
    Json,
    /// YAML documents.
    Yaml,
    /// XML documents, including XSL and SVG.
    Xml,
    /// TOML documents.
    Toml,
    /// INI-style configuration files.
    Ini,
    /// Comma- or tab-separated values.
    Csv,
    /// Markdown documents.
    Markdown,
    /// HTML documents.
    Html,
    /// Plain text with no more specific format.
    Text,
    /// Non-text content.
    Binary,
}

/// Extension table consulted first by the classifier.
///
/// Every alias accepted by the checker registry appears here so extension
/// lookup and classification always agree.
const EXTENSIONS: &[(&str, TypeKey)] = &[
    ("sh", TypeKey::Shell),
    ("bash", TypeKey::Shell),
    ("zsh", TypeKey::Shell),
    ("ksh", TypeKey::Shell),
    ("py", TypeKey::Python),
    ("pyw", TypeKey::Python),
    ("pyi", TypeKey::Python),
    ("php", TypeKey::Php),
    ("php3", TypeKey::Php),
    ("php4", TypeKey::Php),
    ("php5", TypeKey::Php),
    ("php7", TypeKey::Php),
    ("phtml", TypeKey::Php),
    ("phps", TypeKey::Php),
    ("c", TypeKey::C),
    ("h", TypeKey::C),
    ("json", TypeKey::Json),
    ("jsonld", TypeKey::Json),
    ("yml", TypeKey::Yaml),
    ("yaml", TypeKey::Yaml),
    ("xml", TypeKey::Xml),
    ("xsl", TypeKey::Xml),
    ("xslt", TypeKey::Xml),
    ("svg", TypeKey::Xml),
    ("toml", TypeKey::Toml),
    ("tml", TypeKey::Toml),
    ("ini", TypeKey::Ini),
    ("conf", TypeKey::Ini),
    ("cfg", TypeKey::Ini),
    ("config", TypeKey::Ini),
    ("csv", TypeKey::Csv),
    ("tsv", TypeKey::Csv),
    ("md", TypeKey::Markdown),
    ("markdown", TypeKey::Markdown),
    ("mdown", TypeKey::Markdown),
    ("html", TypeKey::Html),
    ("htm", TypeKey::Html),
    ("xhtml", TypeKey::Html),
    ("txt", TypeKey::Text),
    ("text", TypeKey::Text),
];

impl TypeKey {
    /// Looks up a type key from a file extension, ignoring ASCII case.
    ///
    /// Returns `None` if the extension is not in the table.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| *candidate == normalised)
            .map(|(_, key)| *key)
    }

    /// Looks up a type key from the extension of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        extension_of(path).and_then(|ext| Self::from_extension(&ext))
    }

    /// Returns the lower-case tag for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Python => "python",
            Self::Php => "php",
            Self::C => "c",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }

    /// Extensions mapped to this key by the static table.
    pub fn extensions(self) -> impl Iterator<Item = &'static str> {
        EXTENSIONS
            .iter()
            .filter(move |(_, key)| *key == self)
            .map(|(ext, _)| *ext)
    }

    /// Every type key, in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Shell,
            Self::Python,
            Self::Php,
            Self::C,
            Self::Json,
            Self::Yaml,
            Self::Xml,
            Self::Toml,
            Self::Ini,
            Self::Csv,
            Self::Markdown,
            Self::Html,
            Self::Text,
            Self::Binary,
        ]
    }
}

/// Lower-cased extension of `path`, if it has a UTF-8 one.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a type key tag fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown type key: '{0}'")]
pub struct TypeKeyParseError(String);

impl TypeKeyParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for TypeKey {
    type Err = TypeKeyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == normalised)
            .ok_or(TypeKeyParseError(normalised))
    }
}
