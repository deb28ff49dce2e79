//! The capability every format checker satisfies.

use std::fmt;
use std::path::Path;

use vedit_filetype::TypeKey;

use crate::outcome::ValidationOutcome;

/// Validates a staged working copy.
///
/// Implementations receive the path of a file that already exists on disk
/// and must not modify it. A tool that cannot be found is reported as
/// [`crate::FailureKind::ToolUnavailable`] rather than as a hard failure.
pub trait Checker: Send + Sync + fmt::Debug {
    /// Canonical type key this checker validates.
    fn type_key(&self) -> TypeKey;

    /// Checks the file at `path`.
    fn check(&self, path: &Path) -> ValidationOutcome;
}
