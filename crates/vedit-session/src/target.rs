//! Resolves the name given on the command line to a file to edit.
//!
//! Resolution never touches the filesystem beyond inspection. Names that
//! need the user's consent (a new file, an executable found on `PATH`)
//! are returned as a [`TargetPlan`] so the caller can ask first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use vedit_filetype::{contains_null_byte, read_head};

use crate::error::SessionError;
use crate::prompt::Prompter;

const TARGET_TARGET: &str = "vedit_session::target";

/// Bytes inspected when deciding whether an executable is a script.
const EXECUTABLE_SNIFF_LEN: usize = 1024;

/// Characters with special meaning to a shell.
const SHELL_METACHARACTERS: &[char] = &[
    '`', '$', ';', '|', '&', '<', '>', '(', ')', '{', '}', '*', '?', '[', ']', '!', '"', '\'',
    '\\', '\n', '\0',
];

/// A file chosen for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    path: PathBuf,
    exists: bool,
}

impl FileTarget {
    /// Target at `path`, which does or does not exist yet.
    #[must_use]
    pub const fn new(path: PathBuf, exists: bool) -> Self {
        Self { path, exists }
    }

    /// Path to edit.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true when the file existed before the session.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }
}

/// What resolving a name produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPlan {
    /// An existing regular file, canonicalised.
    Existing(PathBuf),
    /// A text executable found on `PATH`; needs confirmation.
    Executable(PathBuf),
    /// A file that does not exist yet; needs confirmation.
    Create(PathBuf),
}

impl TargetPlan {
    /// Question to ask before editing, if any.
    #[must_use]
    pub fn confirmation(&self) -> Option<String> {
        match self {
            Self::Existing(_) => None,
            Self::Executable(path) => Some(format!("Edit executable [{}]?", path.display())),
            Self::Create(path) => Some(format!("Create '{}'?", path.display())),
        }
    }

    /// Converts the plan into a target without asking.
    #[must_use]
    pub fn into_target(self) -> FileTarget {
        match self {
            Self::Existing(path) | Self::Executable(path) => FileTarget::new(path, true),
            Self::Create(path) => FileTarget::new(path, false),
        }
    }
}

/// Rejects names with shell metacharacters or Unicode spoofing characters.
///
/// `~` is only accepted as the first character.
///
/// # Errors
///
/// Returns [`SessionError::PathSafety`] naming the first offending
/// character.
pub fn check_path_safety(name: &str) -> Result<(), SessionError> {
    let refuse = |reason: String| SessionError::PathSafety {
        path: name.to_owned(),
        reason,
    };
    if name.is_empty() {
        return Err(refuse(String::from("empty name")));
    }
    for (index, ch) in name.char_indices() {
        if SHELL_METACHARACTERS.contains(&ch) {
            return Err(refuse(format!("shell metacharacter {ch:?}")));
        }
        if is_spoofing_character(ch) {
            return Err(refuse(format!(
                "invisible or direction-changing character U+{:04X}",
                u32::from(ch)
            )));
        }
        if ch == '~' && index != 0 {
            return Err(refuse(String::from("'~' is only allowed at the start")));
        }
    }
    Ok(())
}

/// Bidi overrides and isolates, zero-width characters, and the BOM.
const fn is_spoofing_character(ch: char) -> bool {
    matches!(
        ch,
        '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{200B}'..='\u{200F}' | '\u{FEFF}'
    )
}

/// Expands a leading `~` or `~/` to the home directory.
///
/// # Errors
///
/// Returns [`SessionError::HomeUnknown`] when the home directory cannot be
/// determined.
pub fn expand_home(name: &str) -> Result<PathBuf, SessionError> {
    let Some(rest) = name.strip_prefix('~') else {
        return Ok(PathBuf::from(name));
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        return Ok(PathBuf::from(name));
    }
    let home = dirs::home_dir().ok_or(SessionError::HomeUnknown)?;
    Ok(home.join(rest.trim_start_matches('/')))
}

/// Resolves `name` without asking the user anything.
///
/// # Errors
///
/// Returns [`SessionError`] for unsafe names, non-regular files, binary
/// executables, and paths that cannot be inspected.
pub fn plan_target(name: &str) -> Result<TargetPlan, SessionError> {
    check_path_safety(name)?;
    let path = expand_home(name)?;

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => {
            let canonical =
                fs::canonicalize(&path).map_err(|err| SessionError::target(&path, err))?;
            debug!(target: TARGET_TARGET, path = %canonical.display(), "editing existing file");
            return Ok(TargetPlan::Existing(canonical));
        }
        Ok(_) => return Err(SessionError::NotRegularFile { path }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(SessionError::target(&path, err)),
    }

    if !name.contains('/') {
        if let Ok(executable) = which::which(name) {
            return plan_executable(executable);
        }
    }
    let absolute = std::path::absolute(&path).map_err(|err| SessionError::target(&path, err))?;
    debug!(target: TARGET_TARGET, path = %absolute.display(), "new file");
    Ok(TargetPlan::Create(absolute))
}

fn plan_executable(executable: PathBuf) -> Result<TargetPlan, SessionError> {
    let canonical =
        fs::canonicalize(&executable).map_err(|err| SessionError::target(&executable, err))?;
    let head = read_head(&canonical, EXECUTABLE_SNIFF_LEN)
        .map_err(|err| SessionError::target(&canonical, err))?;
    if contains_null_byte(&head) {
        return Err(SessionError::BinaryExecutable { path: canonical });
    }
    debug!(target: TARGET_TARGET, path = %canonical.display(), "found script on PATH");
    Ok(TargetPlan::Executable(canonical))
}

/// Resolves `name` and asks for consent where needed.
///
/// Returns `None` when the user declines.
///
/// # Errors
///
/// Propagates the errors of [`plan_target`].
pub fn resolve_target(
    name: &str,
    prompter: &mut dyn Prompter,
) -> Result<Option<FileTarget>, SessionError> {
    let plan = plan_target(name)?;
    if let Some(question) = plan.confirmation() {
        if !prompter.confirm(&question) {
            return Ok(None);
        }
    }
    Ok(Some(plan.into_target()))
}
