//! Errors that end an edit session.
//!
//! A failed validation is not an error: it is resolved at the prompt and
//! never leaves the engine. The variants here are fatal. Whenever one is
//! returned after staging began, the staging file has already been removed.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Fatal failures raised while preparing or running a session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No configured, environment or fallback editor could be located.
    #[error("no usable editor found (tried: {})", tried.join(", "))]
    EditorNotFound {
        /// Candidate commands, in the order they were tried.
        tried: Vec<String>,
    },

    /// The requested name contains characters that are refused.
    #[error("refusing unsafe path '{path}': {reason}")]
    PathSafety {
        /// Name as given.
        path: String,
        /// What made it unsafe.
        reason: String,
    },

    /// The target exists but is not a regular file.
    #[error("{} is not a regular file", path.display())]
    NotRegularFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The executable found on `PATH` is binary.
    #[error("[{}] is a binary file.", path.display())]
    BinaryExecutable {
        /// Resolved executable path.
        path: PathBuf,
    },

    /// A leading `~` could not be expanded.
    #[error("cannot expand '~': home directory is unknown")]
    HomeUnknown,

    /// The target path could not be inspected or canonicalised.
    #[error("cannot resolve {}: {source}", path.display())]
    TargetIo {
        /// Path being resolved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The staging file or the target's parent directory could not be set up.
    #[error("cannot stage {}: {source}", path.display())]
    StagingIo {
        /// Path being staged or created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The editor could not be started.
    #[error("failed to start editor '{program}': {source}")]
    EditorSpawn {
        /// Editor program.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The editor exited unsuccessfully.
    #[error("editor '{program}' {}", describe_status(status))]
    EditorProcess {
        /// Editor program.
        program: String,
        /// Exit code, or `None` when a signal ended the editor.
        status: Option<i32>,
    },

    /// Replacing the target with the staged copy failed.
    #[error("failed to save {}: {source}", path.display())]
    Commit {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(
        || String::from("was terminated by a signal"),
        |code| format!("exited with status {code}"),
    )
}

impl SessionError {
    pub(crate) fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StagingIo {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn target(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TargetIo {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn commit(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Commit {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}
