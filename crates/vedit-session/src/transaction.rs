//! The edit transaction state machine.
//!
//! A session stages a working copy, opens it in the editor, validates it
//! and then either commits it over the target or discards it:
//!
//! ```text
//! Stage -> Edit -> Validate -> Commit
//!           ^         |
//!           |         v
//!           +---- Prompt -> Commit | Abort
//! ```
//!
//! Without a checker, Edit goes straight to Commit. The target is only
//! touched by the final rename, so every other exit path leaves it as it
//! was. The interrupt flag is checked after each blocking step.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};
use vedit_checkers::{
    Checker, FailureKind, SupplementaryCheck, ValidationFailure, ValidationOutcome,
    ValidatorRegistry,
};
use vedit_filetype::{Classifier, ContentProbe};

use crate::editor::{EditorCommand, EditorLauncher};
use crate::error::SessionError;
use crate::interrupt::InterruptFlag;
use crate::prompt::{Decision, Prompter};
use crate::report::{AbortReason, Reporter, SessionEvent};
use crate::staging::StagingFile;
use crate::target::FileTarget;

const TRANSACTION_TARGET: &str = "vedit_session::transaction";

/// Why the working copy was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitBasis {
    /// No checker applied, or validation was disabled.
    Unchecked,
    /// The checker accepted the working copy.
    Passed,
    /// The checker's tool was unavailable.
    Skipped,
    /// The user saved despite a failed validation.
    Overridden,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The target now holds the edited content.
    Committed {
        /// Why the commit went ahead.
        basis: CommitBasis,
    },
    /// The target is untouched.
    Aborted {
        /// Why the session ended.
        reason: AbortReason,
    },
}

impl SessionOutcome {
    /// Returns true when the target was replaced.
    #[must_use]
    pub const fn committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Picks the checker for `target`, unless validation is disabled.
///
/// The extension alias table decides first; the classifier only runs for
/// names it does not cover.
#[must_use]
pub fn select_checker<P: ContentProbe>(
    registry: &ValidatorRegistry,
    classifier: &Classifier<P>,
    target: &Path,
    validate: bool,
) -> Option<Arc<dyn Checker>> {
    if !validate {
        debug!(target: TRANSACTION_TARGET, "validation disabled");
        return None;
    }
    let resolved = registry.resolve(target, |path| classifier.classify(path))?;
    debug!(
        target: TRANSACTION_TARGET,
        type_key = %resolved.checker().type_key(),
        via_extension = resolved.via_extension(),
        "selected checker"
    );
    Some(Arc::clone(resolved.checker()))
}

/// States of one session.
#[derive(Debug)]
enum State {
    Edit { first: bool },
    Validate,
    Prompt(ValidationFailure),
    Commit(CommitBasis),
    Abort(AbortReason),
}

/// One edit of one file.
pub struct EditSession<'a> {
    target: FileTarget,
    editor: &'a EditorCommand,
    launcher: &'a dyn EditorLauncher,
    checker: Option<Arc<dyn Checker>>,
    supplementary: Option<&'a dyn SupplementaryCheck>,
    line: Option<u32>,
    interrupt: InterruptFlag,
}

impl<'a> EditSession<'a> {
    /// Session editing `target` with `editor`, launched through `launcher`.
    #[must_use]
    pub fn new(
        target: FileTarget,
        editor: &'a EditorCommand,
        launcher: &'a dyn EditorLauncher,
    ) -> Self {
        Self {
            target,
            editor,
            launcher,
            checker: None,
            supplementary: None,
            line: None,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Validates with `checker`; `None` commits without validation.
    #[must_use]
    pub fn with_checker(mut self, checker: Option<Arc<dyn Checker>>) -> Self {
        self.checker = checker;
        self
    }

    /// Runs `check` after a successful validation when it applies.
    #[must_use]
    pub fn with_supplementary(mut self, check: Option<&'a dyn SupplementaryCheck>) -> Self {
        self.supplementary = check;
        self
    }

    /// Opens the editor at `line` the first time.
    #[must_use]
    pub const fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Aborts when `interrupt` is raised.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Runs the session to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when staging, the editor, or the commit
    /// fails. The staging file is removed before the error is returned.
    pub fn run(
        self,
        prompter: &mut dyn Prompter,
        reporter: &mut dyn Reporter,
    ) -> Result<SessionOutcome, SessionError> {
        let staging = StagingFile::create(&self.target)?;
        let mut state = State::Edit { first: true };
        loop {
            debug!(target: TRANSACTION_TARGET, state = ?state, "entering state");
            state = match state {
                State::Edit { first } => self.edit(&staging, first)?,
                State::Validate => self.validate(&staging, reporter),
                State::Prompt(failure) => self.prompt(&failure, prompter),
                State::Commit(basis) => {
                    let path = staging.target().to_path_buf();
                    staging.commit()?;
                    info!(target: TRANSACTION_TARGET, path = %path.display(), basis = ?basis, "committed");
                    reporter.report(&SessionEvent::Committed { path });
                    return Ok(SessionOutcome::Committed { basis });
                }
                State::Abort(reason) => {
                    let path = staging.target().to_path_buf();
                    staging.discard();
                    info!(target: TRANSACTION_TARGET, path = %path.display(), reason = ?reason, "aborted");
                    reporter.report(&SessionEvent::Aborted { path, reason });
                    return Ok(SessionOutcome::Aborted { reason });
                }
            };
        }
    }

    fn edit(&self, staging: &StagingFile, first: bool) -> Result<State, SessionError> {
        let line = if first { self.line } else { None };
        let launched = self.launcher.launch(self.editor, staging.path(), line);
        if self.interrupt.is_raised() {
            return Ok(State::Abort(AbortReason::Interrupted));
        }
        launched?;
        Ok(if self.checker.is_some() {
            State::Validate
        } else {
            State::Commit(CommitBasis::Unchecked)
        })
    }

    fn validate(&self, staging: &StagingFile, reporter: &mut dyn Reporter) -> State {
        let Some(checker) = self.checker.as_ref() else {
            return State::Commit(CommitBasis::Unchecked);
        };
        let key = checker.type_key();
        let outcome = checker.check(staging.path());
        if self.interrupt.is_raised() {
            return State::Abort(AbortReason::Interrupted);
        }
        match outcome {
            ValidationOutcome::Passed => {
                reporter.report(&SessionEvent::ValidationPassed { key });
                let supplementary = self
                    .supplementary
                    .filter(|check| check.applies_to(key, staging.path()));
                if let Some(check) = supplementary {
                    let report = check.run(staging.path());
                    reporter.report(&SessionEvent::Advisories(report));
                    if self.interrupt.is_raised() {
                        return State::Abort(AbortReason::Interrupted);
                    }
                }
                State::Commit(CommitBasis::Passed)
            }
            ValidationOutcome::Failed(failure) if failure.kind() == FailureKind::ToolUnavailable => {
                debug!(target: TRANSACTION_TARGET, type_key = %key, reason = %failure, "validation skipped");
                reporter.report(&SessionEvent::ValidationSkipped { key, failure });
                State::Commit(CommitBasis::Skipped)
            }
            ValidationOutcome::Failed(failure) => {
                reporter.report(&SessionEvent::ValidationFailed {
                    key,
                    failure: failure.clone(),
                });
                State::Prompt(failure)
            }
        }
    }

    fn prompt(&self, failure: &ValidationFailure, prompter: &mut dyn Prompter) -> State {
        let decision = prompter.decide(failure);
        if self.interrupt.is_raised() {
            return State::Abort(AbortReason::Interrupted);
        }
        match decision {
            Decision::ReEdit => State::Edit { first: false },
            Decision::SaveAnyway => State::Commit(CommitBasis::Overridden),
            Decision::Quit => State::Abort(AbortReason::UserQuit),
        }
    }
}
