//! Scripted doubles for driving sessions in tests.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use vedit_checkers::ValidationFailure;

use crate::editor::{EditorCommand, EditorLauncher};
use crate::error::SessionError;
use crate::interrupt::InterruptFlag;
use crate::prompt::{Decision, Prompter};
use crate::report::{Reporter, SessionEvent};

/// What the scripted editor does on one invocation.
#[derive(Debug, Clone)]
pub enum EditStep {
    /// Leaves the file as it is.
    Keep,
    /// Replaces the file content.
    Write(Vec<u8>),
    /// Exits with the given non-zero status.
    Fail(i32),
    /// Raises the flag, as a terminal interrupt would, and exits by signal.
    Interrupt(InterruptFlag),
}

/// One recorded editor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// File that was opened.
    pub path: PathBuf,
    /// Line hint passed, if any.
    pub line: Option<u32>,
}

/// Editor that replays [`EditStep`]s; [`EditStep::Keep`] once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    steps: Mutex<VecDeque<EditStep>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedEditor {
    /// Editor performing `steps` in order.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = EditStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Invocations so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|invocations| invocations.clone())
            .unwrap_or_default()
    }
}

impl EditorLauncher for ScriptedEditor {
    fn launch(
        &self,
        editor: &EditorCommand,
        path: &Path,
        line: Option<u32>,
    ) -> Result<(), SessionError> {
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push(Invocation {
                path: path.to_path_buf(),
                line,
            });
        }
        let step = self
            .steps
            .lock()
            .ok()
            .and_then(|mut steps| steps.pop_front())
            .unwrap_or(EditStep::Keep);
        let program = editor.program().display().to_string();
        match step {
            EditStep::Keep => Ok(()),
            EditStep::Write(content) => fs::write(path, content).map_err(|source| {
                SessionError::EditorSpawn {
                    program,
                    source: Arc::new(source),
                }
            }),
            EditStep::Fail(code) => Err(SessionError::EditorProcess {
                program,
                status: Some(code),
            }),
            EditStep::Interrupt(flag) => {
                flag.raise();
                Err(SessionError::EditorProcess {
                    program,
                    status: None,
                })
            }
        }
    }
}

/// Prompter answering from scripted lists.
///
/// Once the decisions run out it quits; once confirmations run out it
/// declines.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    decisions: VecDeque<Decision>,
    confirmations: VecDeque<bool>,
    raise_on_answer: Option<InterruptFlag>,
    failures: Vec<ValidationFailure>,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    /// Prompter with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers failed validations with `decisions`.
    #[must_use]
    pub fn with_decisions(mut self, decisions: impl IntoIterator<Item = Decision>) -> Self {
        self.decisions = decisions.into_iter().collect();
        self
    }

    /// Answers yes/no questions with `answers`.
    #[must_use]
    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations = answers.into_iter().collect();
        self
    }

    /// Raises `flag` while waiting for any answer.
    #[must_use]
    pub fn raising(mut self, flag: InterruptFlag) -> Self {
        self.raise_on_answer = Some(flag);
        self
    }

    /// Failures the prompter was asked about.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Questions the prompter was asked.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl Prompter for ScriptedPrompter {
    fn decide(&mut self, failure: &ValidationFailure) -> Decision {
        self.failures.push(failure.clone());
        if let Some(flag) = &self.raise_on_answer {
            flag.raise();
        }
        self.decisions.pop_front().unwrap_or(Decision::Quit)
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_owned());
        if let Some(flag) = &self.raise_on_answer {
            flag.raise();
        }
        self.confirmations.pop_front().unwrap_or(false)
    }
}

/// Reporter keeping every event.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// Events in arrival order.
    pub events: Vec<SessionEvent>,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &SessionEvent) {
        self.events.push(event.clone());
    }
}
