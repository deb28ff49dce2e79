//! Configurable checker doubles for tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use vedit_filetype::TypeKey;

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};

/// Checker that replays scripted outcomes.
///
/// Outcomes are returned in order; the last one repeats once the script
/// runs out.
#[derive(Debug)]
pub struct ConfigurableChecker {
    key: TypeKey,
    script: Mutex<VecDeque<ValidationOutcome>>,
    last: Mutex<ValidationOutcome>,
    calls: AtomicUsize,
}

impl ConfigurableChecker {
    /// Checker that replays `outcomes` for `key`.
    #[must_use]
    pub fn scripted(key: TypeKey, outcomes: impl IntoIterator<Item = ValidationOutcome>) -> Self {
        Self {
            key,
            script: Mutex::new(outcomes.into_iter().collect()),
            last: Mutex::new(ValidationOutcome::Passed),
            calls: AtomicUsize::new(0),
        }
    }

    /// Checker that always passes.
    #[must_use]
    pub fn passing(key: TypeKey) -> Self {
        Self::scripted(key, [ValidationOutcome::Passed])
    }

    /// Checker that always fails with `failure`.
    #[must_use]
    pub fn failing(key: TypeKey, failure: ValidationFailure) -> Self {
        Self::scripted(key, [ValidationOutcome::Failed(failure)])
    }

    /// Number of times [`Checker::check`] ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Checker for ConfigurableChecker {
    fn type_key(&self) -> TypeKey {
        self.key
    }

    fn check(&self, _path: &Path) -> ValidationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        let Ok(mut last) = self.last.lock() else {
            return ValidationOutcome::Passed;
        };
        if let Some(outcome) = next {
            *last = outcome;
        }
        last.clone()
    }
}
