//! Finding and launching the external editor.
//!
//! [`resolve_editor`] returns an explicit [`EditorCommand`] and never writes
//! to the environment. [`EditorLauncher`] is the seam the session engine
//! calls; [`ProcessEditor`] is the real implementation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tracing::debug;

use crate::error::SessionError;

const EDITOR_TARGET: &str = "vedit_session::editor";

/// Editors probed, in order, when neither configuration nor `EDITOR`
/// names a usable one.
pub const FALLBACK_EDITORS: &[&str] = &[
    "joe", "nano", "vim", "vi", "mcedit", "ne", "micro", "emacs", "jed", "gedit",
];

/// Directories searched after `PATH`.
pub const FALLBACK_DIRS: &[&str] = &["/usr/bin", "/usr/local/bin", "/bin", "/snap/bin"];

/// A resolved editor program with its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl EditorCommand {
    /// Command running `program` with `args` before the file arguments.
    #[must_use]
    pub const fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Absolute path of the editor program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments placed before the file arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argument list for opening `path`, optionally at `line`.
    #[must_use]
    pub fn arguments_for(&self, path: &Path, line: Option<u32>) -> Vec<String> {
        let mut arguments = self.args.clone();
        if let Some(line) = line {
            arguments.push(format!("+{line}"));
        }
        arguments.push(path.display().to_string());
        arguments
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Picks the editor to run.
///
/// Candidates are tried in order: `configured`, then `environment` (the
/// value of `EDITOR`), then [`FALLBACK_EDITORS`]. Each candidate is split
/// with shell-word rules, so `code --wait` works.
///
/// # Errors
///
/// Returns [`SessionError::EditorNotFound`] listing every candidate tried.
pub fn resolve_editor(
    configured: Option<&str>,
    environment: Option<&str>,
) -> Result<EditorCommand, SessionError> {
    let candidates = configured
        .into_iter()
        .chain(environment)
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .chain(FALLBACK_EDITORS.iter().copied());

    let mut tried = Vec::new();
    for candidate in candidates {
        if let Some(command) = parse_candidate(candidate) {
            debug!(target: EDITOR_TARGET, editor = %command, "resolved editor");
            return Ok(command);
        }
        tried.push(candidate.to_owned());
    }
    Err(SessionError::EditorNotFound { tried })
}

/// Splits `candidate` and locates its program.
fn parse_candidate(candidate: &str) -> Option<EditorCommand> {
    let mut words = shlex::split(candidate)?.into_iter();
    let name = words.next()?;
    let program = locate_program(&name)?;
    Some(EditorCommand::new(program, words.collect()))
}

/// Finds an executable named `name`.
///
/// Names containing a separator are checked as given; bare names are looked
/// up on `PATH`, then in [`FALLBACK_DIRS`].
#[must_use]
pub fn locate_program(name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        return is_executable(&path).then_some(path);
    }
    which::which(name).ok().or_else(|| {
        FALLBACK_DIRS
            .iter()
            .map(|dir| Path::new(dir).join(name))
            .find(|path| is_executable(path))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_file())
}

/// Opens a file in an editor and waits for it to close.
pub trait EditorLauncher {
    /// Runs `editor` on `path`, passing `line` as a `+N` hint when given.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EditorSpawn`] when the editor cannot start
    /// and [`SessionError::EditorProcess`] when it exits unsuccessfully.
    fn launch(
        &self,
        editor: &EditorCommand,
        path: &Path,
        line: Option<u32>,
    ) -> Result<(), SessionError>;
}

/// Runs the editor as a child process attached to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEditor;

impl EditorLauncher for ProcessEditor {
    fn launch(
        &self,
        editor: &EditorCommand,
        path: &Path,
        line: Option<u32>,
    ) -> Result<(), SessionError> {
        let program = editor.program().display().to_string();
        let arguments = editor.arguments_for(path, line);
        debug!(
            target: EDITOR_TARGET,
            program = %program,
            arguments = ?arguments,
            "launching editor"
        );
        let status = Command::new(editor.program())
            .args(&arguments)
            .status()
            .map_err(|source| SessionError::EditorSpawn {
                program: program.clone(),
                source: Arc::new(source),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SessionError::EditorProcess {
                program,
                status: status.code(),
            })
        }
    }
}
