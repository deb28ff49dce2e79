//! Unit tests for the edit session state machine.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};
use vedit_checkers::doubles::ConfigurableChecker;
use vedit_checkers::{
    Checker, JsonChecker, Shellcheck, SupplementaryCheck, SupplementaryReport, ValidationFailure,
    ValidationOutcome, ValidatorRegistry,
};
use vedit_filetype::{Classifier, NoContentProbe, TypeKey};

use super::{Workspace, editor_command, mode_of};
use crate::error::SessionError;
use crate::interrupt::InterruptFlag;
use crate::prompt::Decision;
use crate::report::{AbortReason, SessionEvent};
use crate::target::FileTarget;
use crate::test_support::{EditStep, RecordingReporter, ScriptedEditor, ScriptedPrompter};
use crate::transaction::{CommitBasis, EditSession, SessionOutcome, select_checker};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn json_checker() -> Option<Arc<dyn Checker>> {
    Some(Arc::new(JsonChecker))
}

#[derive(Debug, Default)]
struct FixedAdvice;

impl SupplementaryCheck for FixedAdvice {
    fn applies_to(&self, key: TypeKey, path: &Path) -> bool {
        Shellcheck::new("style", "bash").applies_to(key, path)
    }

    fn run(&self, _path: &Path) -> SupplementaryReport {
        SupplementaryReport::Unavailable(String::from("advice ran"))
    }
}

#[rstest]
fn no_op_edit_round_trips_bytes_and_mode(workspace: Workspace) {
    let content = b"{\n  \"name\": \"vedit\"\n}\n";
    let target = workspace.existing("data.json", content, 0o640);
    let editor = ScriptedEditor::new([EditStep::Keep]);
    let command = editor_command();

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_checker(json_checker())
        .run(&mut ScriptedPrompter::new(), &mut RecordingReporter::default())
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Committed { basis: CommitBasis::Passed });
    assert_eq!(fs::read(target.path()).expect("read"), content);
    assert_eq!(mode_of(target.path()), 0o640);
    assert!(workspace.leftovers().is_empty());
}

#[rstest]
fn quitting_after_invalid_json_keeps_target(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{\"a\": 1}", 0o644);
    let editor = ScriptedEditor::new([EditStep::Write(b"{\"a\": 1,}".to_vec())]);
    let command = editor_command();
    let mut prompter = ScriptedPrompter::new().with_decisions([Decision::Quit]);
    let mut reporter = RecordingReporter::default();

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_checker(json_checker())
        .run(&mut prompter, &mut reporter)
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Aborted { reason: AbortReason::UserQuit });
    assert_eq!(fs::read(target.path()).expect("read"), b"{\"a\": 1}");
    assert!(workspace.leftovers().is_empty());
    let failure = prompter.failures().first().expect("prompted");
    assert!(!failure.message().is_empty());
    assert!(reporter
        .events
        .iter()
        .any(|event| matches!(event, SessionEvent::ValidationFailed { .. })));
}

#[rstest]
fn save_anyway_commits_invalid_json(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{}", 0o644);
    let editor = ScriptedEditor::new([EditStep::Write(b"{\"a\": 1,}".to_vec())]);
    let command = editor_command();
    let mut prompter = ScriptedPrompter::new().with_decisions([Decision::SaveAnyway]);

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_checker(json_checker())
        .run(&mut prompter, &mut RecordingReporter::default())
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Committed { basis: CommitBasis::Overridden });
    assert_eq!(fs::read(target.path()).expect("read"), b"{\"a\": 1,}");
    assert!(workspace.leftovers().is_empty());
}

#[rstest]
fn failing_editor_is_fatal_and_cleans_up(workspace: Workspace) {
    let target = workspace.existing("notes.txt", b"keep me", 0o644);
    let editor = ScriptedEditor::new([EditStep::Fail(2)]);
    let command = editor_command();

    let err = EditSession::new(target.clone(), &command, &editor)
        .run(&mut ScriptedPrompter::new(), &mut RecordingReporter::default())
        .expect_err("editor failure");

    assert!(matches!(err, SessionError::EditorProcess { status: Some(2), .. }));
    assert_eq!(fs::read(target.path()).expect("read"), b"keep me");
    assert!(workspace.leftovers().is_empty());
}

#[rstest]
fn line_hint_is_only_used_on_first_edit(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{}", 0o644);
    let editor = ScriptedEditor::new([
        EditStep::Write(b"{,}".to_vec()),
        EditStep::Write(b"{\"fixed\": true}".to_vec()),
    ]);
    let command = editor_command();
    let mut prompter = ScriptedPrompter::new().with_decisions([Decision::ReEdit]);

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_checker(json_checker())
        .with_line(Some(5))
        .run(&mut prompter, &mut RecordingReporter::default())
        .expect("session");

    assert!(outcome.committed());
    let lines: Vec<_> = editor.invocations().iter().map(|call| call.line).collect();
    assert_eq!(lines, [Some(5), None]);
    assert_eq!(fs::read(target.path()).expect("read"), b"{\"fixed\": true}");
}

#[rstest]
fn interrupt_during_edit_aborts(workspace: Workspace) {
    let target = workspace.existing("notes.txt", b"before", 0o644);
    let interrupt = InterruptFlag::new();
    let editor = ScriptedEditor::new([EditStep::Interrupt(interrupt.clone())]);
    let command = editor_command();

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_interrupt(interrupt)
        .run(&mut ScriptedPrompter::new(), &mut RecordingReporter::default())
        .expect("interrupt is an abort, not an error");

    assert_eq!(outcome, SessionOutcome::Aborted { reason: AbortReason::Interrupted });
    assert_eq!(fs::read(target.path()).expect("read"), b"before");
    assert!(workspace.leftovers().is_empty());
}

#[rstest]
fn interrupt_at_prompt_aborts_even_if_save_was_chosen(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{}", 0o644);
    let interrupt = InterruptFlag::new();
    let editor = ScriptedEditor::new([EditStep::Write(b"nope".to_vec())]);
    let command = editor_command();
    let mut prompter = ScriptedPrompter::new()
        .with_decisions([Decision::SaveAnyway])
        .raising(interrupt.clone());

    let outcome = EditSession::new(target.clone(), &command, &editor)
        .with_checker(json_checker())
        .with_interrupt(interrupt)
        .run(&mut prompter, &mut RecordingReporter::default())
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Aborted { reason: AbortReason::Interrupted });
    assert_eq!(fs::read(target.path()).expect("read"), b"{}");
}

#[rstest]
fn unavailable_tool_is_a_skip(workspace: Workspace) {
    let target = workspace.existing("page.php", b"<?php echo 1;", 0o644);
    let checker = ConfigurableChecker::failing(
        TypeKey::Php,
        ValidationFailure::tool_unavailable("php", "not found"),
    );
    let editor = ScriptedEditor::new([EditStep::Keep]);
    let command = editor_command();
    let mut reporter = RecordingReporter::default();

    let outcome = EditSession::new(target, &command, &editor)
        .with_checker(Some(Arc::new(checker)))
        .run(&mut ScriptedPrompter::new(), &mut reporter)
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Committed { basis: CommitBasis::Skipped });
    assert!(matches!(
        reporter.events.first(),
        Some(SessionEvent::ValidationSkipped { key: TypeKey::Php, .. })
    ));
}

#[rstest]
fn supplementary_check_runs_after_shell_passes(workspace: Workspace) {
    let target = workspace.existing("run.sh", b"echo hi\n", 0o755);
    let checker = ConfigurableChecker::passing(TypeKey::Shell);
    let editor = ScriptedEditor::new([]);
    let command = editor_command();
    let advice = FixedAdvice;
    let mut reporter = RecordingReporter::default();

    EditSession::new(target, &command, &editor)
        .with_checker(Some(Arc::new(checker)))
        .with_supplementary(Some(&advice))
        .run(&mut ScriptedPrompter::new(), &mut reporter)
        .expect("session");

    assert!(reporter.events.contains(&SessionEvent::Advisories(
        SupplementaryReport::Unavailable(String::from("advice ran"))
    )));
}

#[rstest]
fn supplementary_check_runs_for_shell_directive_under_other_checker(workspace: Workspace) {
    let target = workspace.existing("deploy.conf", b"#!/bin/bash\necho hi\n", 0o644);
    let checker = ConfigurableChecker::passing(TypeKey::Ini);
    let editor = ScriptedEditor::new([]);
    let command = editor_command();
    let advice = FixedAdvice;
    let mut reporter = RecordingReporter::default();

    EditSession::new(target, &command, &editor)
        .with_checker(Some(Arc::new(checker)))
        .with_supplementary(Some(&advice))
        .run(&mut ScriptedPrompter::new(), &mut reporter)
        .expect("session");

    assert!(reporter.events.contains(&SessionEvent::Advisories(
        SupplementaryReport::Unavailable(String::from("advice ran"))
    )));
}

#[rstest]
fn supplementary_check_ignores_other_types(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{}", 0o644);
    let editor = ScriptedEditor::new([]);
    let command = editor_command();
    let advice = FixedAdvice;
    let mut reporter = RecordingReporter::default();

    EditSession::new(target, &command, &editor)
        .with_checker(json_checker())
        .with_supplementary(Some(&advice))
        .run(&mut ScriptedPrompter::new(), &mut reporter)
        .expect("session");

    assert!(!reporter
        .events
        .iter()
        .any(|event| matches!(event, SessionEvent::Advisories(_))));
}

#[rstest]
fn re_edit_loops_until_the_checker_passes(workspace: Workspace) {
    let target = workspace.existing("data.json", b"{}", 0o644);
    let failure = ValidationFailure::syntax("still broken");
    let checker = Arc::new(ConfigurableChecker::scripted(
        TypeKey::Json,
        [
            ValidationOutcome::Failed(failure.clone()),
            ValidationOutcome::Failed(failure),
            ValidationOutcome::Passed,
        ],
    ));
    let editor = ScriptedEditor::new([]);
    let command = editor_command();
    let mut prompter =
        ScriptedPrompter::new().with_decisions([Decision::ReEdit, Decision::ReEdit]);

    let outcome = EditSession::new(target, &command, &editor)
        .with_checker(Some(Arc::clone(&checker) as Arc<dyn Checker>))
        .run(&mut prompter, &mut RecordingReporter::default())
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Committed { basis: CommitBasis::Passed });
    assert_eq!(checker.calls(), 3);
    assert_eq!(editor.invocations().len(), 3);
}

#[rstest]
fn new_file_is_created_on_commit(workspace: Workspace) {
    let path = workspace.path("fresh/notes.txt");
    let editor = ScriptedEditor::new([EditStep::Write(b"hello\n".to_vec())]);
    let command = editor_command();

    let outcome = EditSession::new(FileTarget::new(path.clone(), false), &command, &editor)
        .run(&mut ScriptedPrompter::new(), &mut RecordingReporter::default())
        .expect("session");

    assert_eq!(outcome, SessionOutcome::Committed { basis: CommitBasis::Unchecked });
    assert_eq!(fs::read(&path).expect("read"), b"hello\n");
    assert_eq!(mode_of(&path), 0o644);
}

#[rstest]
#[case("settings.json", true, Some(TypeKey::Json))]
#[case("settings.json", false, None)]
#[case("notes.txt", true, None)]
#[case("values.tsv", true, Some(TypeKey::Csv))]
fn checker_selection(
    #[case] name: &str,
    #[case] validate: bool,
    #[case] expected: Option<TypeKey>,
) {
    let registry = ValidatorRegistry::builtin().expect("registry");
    let classifier = Classifier::with_probe(NoContentProbe);
    let selected = select_checker(&registry, &classifier, Path::new(name), validate);
    assert_eq!(selected.map(|checker| checker.type_key()), expected);
}

#[rstest]
fn shebang_selects_checker_without_extension(workspace: Workspace) {
    let target = workspace.existing("deploy", b"#!/usr/bin/env bash\necho hi\n", 0o755);
    let registry = ValidatorRegistry::builtin().expect("registry");
    let classifier = Classifier::with_probe(NoContentProbe);
    let selected = select_checker(&registry, &classifier, target.path(), true);
    assert_eq!(selected.map(|checker| checker.type_key()), Some(TypeKey::Shell));
}
