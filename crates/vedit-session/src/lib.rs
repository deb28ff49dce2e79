//! Edit sessions: stage, edit, validate, then commit or discard.
//!
//! [`EditSession`] drives one edit of one file. It copies the target into a
//! hidden staging file beside it, runs the editor on that copy, checks the
//! result, and asks the user what to do when the check fails. The target is
//! replaced by a single rename at the very end, or not at all.
//!
//! The surrounding pieces are here too: [`plan_target`] and
//! [`resolve_target`] turn a command-line name into a [`FileTarget`],
//! [`resolve_editor`] finds the editor, and [`InterruptFlag`] turns
//! termination signals into a clean abort.

mod editor;
mod error;
mod interrupt;
mod prompt;
mod report;
mod staging;
mod target;
mod transaction;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use editor::{
    EditorCommand, EditorLauncher, FALLBACK_DIRS, FALLBACK_EDITORS, ProcessEditor, locate_program,
    resolve_editor,
};
pub use error::SessionError;
pub use interrupt::InterruptFlag;
pub use prompt::{Decision, Prompter, TerminalPrompter, parse_yes_no};
pub use report::{AbortReason, NoopReporter, Reporter, SessionEvent, StreamReporter, render};
pub use staging::StagingFile;
pub use target::{
    FileTarget, TargetPlan, check_path_safety, expand_home, plan_target, resolve_target,
};
pub use transaction::{CommitBasis, EditSession, SessionOutcome, select_checker};

#[cfg(test)]
mod tests;
