//! Session tests shared helpers.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::editor::EditorCommand;
use crate::target::FileTarget;

mod behaviour;
mod transaction;

/// A temporary directory holding one target file.
pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `content` to `name` with `mode` and returns it as a target.
    pub(crate) fn existing(&self, name: &str, content: &[u8], mode: u32) -> FileTarget {
        let path = self.path(name);
        fs::write(&path, content).expect("write target");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod target");
        FileTarget::new(path, true)
    }

    /// Names of staging files left in the directory.
    pub(crate) fn leftovers(&self) -> Vec<String> {
        fs::read_dir(self.dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(".~"))
            .collect()
    }
}

pub(crate) fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).expect("metadata").permissions().mode() & 0o7777
}

pub(crate) fn editor_command() -> EditorCommand {
    EditorCommand::new(PathBuf::from("/usr/bin/scripted-editor"), Vec::new())
}
