//! The working copy edited in place of the target.
//!
//! The staging file lives beside the target so committing is a rename on
//! one filesystem. It is named `.~<name>.<random>.<ext>`, keeping the
//! extension for editor syntax highlighting. Until [`StagingFile::commit`]
//! succeeds, dropping the value deletes the file.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::target::FileTarget;

const STAGING_TARGET: &str = "vedit_session::staging";

/// Mode given to the staging copy of a new file.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// A staged working copy of one target.
#[derive(Debug)]
pub struct StagingFile {
    path: TempPath,
    target: PathBuf,
}

impl StagingFile {
    /// Creates the staging file for `target`.
    ///
    /// Missing parent directories are created. An existing target's bytes
    /// and permissions are copied; a new target starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StagingIo`] when the directory, the file, or
    /// the copy cannot be created.
    pub fn create(target: &FileTarget) -> Result<Self, SessionError> {
        let target_path = target.path();
        let parent = parent_dir(target_path);
        fs::create_dir_all(parent).map_err(|err| SessionError::staging(parent, err))?;

        let (prefix, suffix) = staging_affixes(target_path);
        let path = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(parent)
            .map_err(|err| SessionError::staging(parent, err))?
            .into_temp_path();

        if target.exists() {
            fs::copy(target_path, &path).map_err(|err| SessionError::staging(&*path, err))?;
        } else {
            set_new_file_permissions(&path).map_err(|err| SessionError::staging(&*path, err))?;
        }

        debug!(
            target: STAGING_TARGET,
            staging = %path.display(),
            target_path = %target_path.display(),
            "staged working copy"
        );
        Ok(Self {
            path,
            target: target_path.to_path_buf(),
        })
    }

    /// Path of the working copy.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the working copy will replace.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Replaces the target with the working copy.
    ///
    /// A rename is used; only when the rename crosses devices is the content
    /// copied and the working copy removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Commit`] if the target cannot be replaced. The
    /// working copy is removed either way.
    pub fn commit(self) -> Result<(), SessionError> {
        let Self { path, target } = self;
        match path.persist(&target) {
            Ok(()) => {
                debug!(target: STAGING_TARGET, target_path = %target.display(), "committed");
                Ok(())
            }
            Err(err) if err.error.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(&err.path, &target).map_err(|copy| SessionError::commit(&target, copy))?;
                debug!(
                    target: STAGING_TARGET,
                    target_path = %target.display(),
                    "committed by copy across devices"
                );
                Ok(())
            }
            Err(err) => Err(SessionError::commit(&target, err.error)),
        }
    }

    /// Removes the working copy without touching the target.
    pub fn discard(self) {
        let staging = self.path.to_path_buf();
        if let Err(err) = self.path.close() {
            warn!(
                target: STAGING_TARGET,
                staging = %staging.display(),
                error = %err,
                "failed to remove staging file"
            );
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Prefix and suffix that make the staging name hidden and keep the
/// target's extension last.
fn staging_affixes(target: &Path) -> (OsString, OsString) {
    let mut prefix = OsString::from(".~");
    if let Some(name) = target.file_name() {
        prefix.push(name);
    }
    prefix.push(".");
    let suffix = target.extension().map_or_else(OsString::new, |ext| {
        let mut suffix = OsString::from(".");
        suffix.push(ext);
        suffix
    });
    (prefix, suffix)
}

#[cfg(unix)]
fn set_new_file_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
