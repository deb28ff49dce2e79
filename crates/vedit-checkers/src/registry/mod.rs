//! Lookup table from type keys and extension aliases to checkers.
//!
//! The [`ValidatorRegistry`] is assembled once from a list of checkers and
//! an alias table, then only read. Aliases point at type keys rather than
//! holding their own checker, so an alias and its canonical key always
//! yield the same shared instance.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use vedit_filetype::{TypeClassification, TypeKey, extension_of};

use crate::checker::Checker;
use crate::formats::{
    CsvChecker, IniChecker, JsonChecker, PhpChecker, PythonChecker, ReadableTextChecker,
    ShellChecker, TomlChecker, XmlChecker, YamlChecker,
};

/// Extension aliases registered for the built-in checkers.
const BUILTIN_ALIASES: &[(&str, TypeKey)] = &[
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
    ("py", TypeKey::Python),
    ("pyw", TypeKey::Python),
    ("pyi", TypeKey::Python),
    ("sh", TypeKey::Shell),
    ("bash", TypeKey::Shell),
    ("zsh", TypeKey::Shell),
    ("ksh", TypeKey::Shell),
    ("php", TypeKey::Php),
    ("php3", TypeKey::Php),
    ("php4", TypeKey::Php),
    ("php5", TypeKey::Php),
    ("php7", TypeKey::Php),
    ("phtml", TypeKey::Php),
    ("phps", TypeKey::Php),
];

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two checkers claimed the same type key.
    #[error("more than one checker registered for '{key}'")]
    DuplicateChecker {
        /// Contested type key.
        key: TypeKey,
    },
    /// An alias names a type key with no checker.
    #[error("alias '{alias}' points at '{key}', which has no checker")]
    DanglingAlias {
        /// The alias extension.
        alias: String,
        /// The type key it names.
        key: TypeKey,
    },
}

/// How a checker was chosen for a path.
#[derive(Debug, Clone)]
pub struct ResolvedChecker {
    checker: Arc<dyn Checker>,
    via_extension: bool,
}

impl ResolvedChecker {
    /// The selected checker.
    #[must_use]
    pub fn checker(&self) -> &Arc<dyn Checker> {
        &self.checker
    }

    /// Returns true when the extension alias table made the choice.
    #[must_use]
    pub const fn via_extension(&self) -> bool {
        self.via_extension
    }
}

/// Immutable mapping from type keys and aliases to checkers.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    checkers: BTreeMap<TypeKey, Arc<dyn Checker>>,
    aliases: BTreeMap<String, TypeKey>,
}

impl ValidatorRegistry {
    /// Registry holding every built-in checker.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the built-in tables disagree, which
    /// indicates a programming error.
    pub fn builtin() -> Result<Self, RegistryError> {
        let checkers: Vec<Arc<dyn Checker>> = vec![
            Arc::new(JsonChecker),
            Arc::new(YamlChecker::new()),
            Arc::new(XmlChecker),
            Arc::new(TomlChecker),
            Arc::new(IniChecker),
            Arc::new(CsvChecker),
            Arc::new(ReadableTextChecker::new(TypeKey::Markdown)),
            Arc::new(ReadableTextChecker::new(TypeKey::Html)),
            Arc::new(PythonChecker),
            Arc::new(ShellChecker),
            Arc::new(PhpChecker),
        ];
        Self::from_parts(checkers, BUILTIN_ALIASES)
    }

    /// Assembles a registry from checkers and an alias table.
    ///
    /// Each checker is registered under its own [`Checker::type_key`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateChecker`] when two checkers share a
    /// key and [`RegistryError::DanglingAlias`] when an alias names a key
    /// with no checker.
    pub fn from_parts(
        checkers: impl IntoIterator<Item = Arc<dyn Checker>>,
        aliases: &[(&str, TypeKey)],
    ) -> Result<Self, RegistryError> {
        let mut table = BTreeMap::new();
        for checker in checkers {
            let key = checker.type_key();
            if table.insert(key, checker).is_some() {
                return Err(RegistryError::DuplicateChecker { key });
            }
        }

        let mut alias_table = BTreeMap::new();
        for &(alias, key) in aliases {
            if !table.contains_key(&key) {
                return Err(RegistryError::DanglingAlias {
                    alias: alias.to_owned(),
                    key,
                });
            }
            alias_table.insert(alias.to_ascii_lowercase(), key);
        }

        Ok(Self {
            checkers: table,
            aliases: alias_table,
        })
    }

    /// Looks up a checker by extension alias or canonical key name.
    ///
    /// Aliases are consulted first, ignoring ASCII case.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Checker>> {
        let normalised = name.trim().trim_start_matches('.').to_ascii_lowercase();
        self.aliases
            .get(&normalised)
            .copied()
            .or_else(|| normalised.parse::<TypeKey>().ok())
            .and_then(|key| self.lookup_key(key))
    }

    /// Looks up a checker by type key.
    #[must_use]
    pub fn lookup_key(&self, key: TypeKey) -> Option<&Arc<dyn Checker>> {
        self.checkers.get(&key)
    }

    /// Chooses a checker for `path`.
    ///
    /// The extension alias table wins; `classify` is only invoked when the
    /// extension is missing or unknown.
    #[must_use]
    pub fn resolve(
        &self,
        path: &Path,
        classify: impl FnOnce(&Path) -> TypeClassification,
    ) -> Option<ResolvedChecker> {
        if let Some(checker) = extension_of(path)
            .and_then(|ext| self.aliases.get(&ext).copied())
            .and_then(|key| self.lookup_key(key))
        {
            return Some(ResolvedChecker {
                checker: Arc::clone(checker),
                via_extension: true,
            });
        }
        let classification = classify(path);
        self.lookup_key(classification.key())
            .map(|checker| ResolvedChecker {
                checker: Arc::clone(checker),
                via_extension: false,
            })
    }

    /// Registered type keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.checkers.keys().copied()
    }

    /// Aliases registered for `key`, sorted.
    pub fn aliases_for(&self, key: TypeKey) -> impl Iterator<Item = &str> + '_ {
        self.aliases
            .iter()
            .filter(move |(_, target)| **target == key)
            .map(|(alias, _)| alias.as_str())
    }

    /// Number of registered checkers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Returns true when no checker is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}
