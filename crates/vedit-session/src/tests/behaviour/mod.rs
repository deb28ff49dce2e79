//! Behaviour-driven step definitions for edit sessions.

use std::cell::RefCell;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, then, when};
use vedit_checkers::{Checker, FailureKind, JsonChecker};

use super::{Workspace, editor_command, mode_of};
use crate::error::SessionError;
use crate::interrupt::InterruptFlag;
use crate::prompt::Decision;
use crate::target::FileTarget;
use crate::test_support::{
    EditStep, Invocation, RecordingReporter, ScriptedEditor, ScriptedPrompter,
};
use crate::transaction::{EditSession, SessionOutcome};

mod scenarios;

// =============================================================================
// Test World
// =============================================================================

/// State shared across BDD steps.
struct TestWorld {
    workspace: Workspace,
    target: Option<FileTarget>,
    checker: Option<Arc<dyn Checker>>,
    steps: Vec<EditStep>,
    decisions: Vec<Decision>,
    line: Option<u32>,
    interrupt: InterruptFlag,
    result: Option<Result<SessionOutcome, SessionError>>,
    invocations: Vec<Invocation>,
    prompted: Vec<FailureKind>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld {
        workspace: Workspace::new(),
        target: None,
        checker: None,
        steps: Vec::new(),
        decisions: Vec::new(),
        line: None,
        interrupt: InterruptFlag::new(),
        result: None,
        invocations: Vec::new(),
        prompted: Vec::new(),
    })
}

/// Strips surrounding double quotes from a step argument.
fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

fn target_path(world: &TestWorld) -> std::path::PathBuf {
    world
        .target
        .as_ref()
        .expect("target should be set")
        .path()
        .to_path_buf()
}

// =============================================================================
// Given Steps
// =============================================================================

#[given("a target file {name} containing {content}")]
fn given_target(world: &RefCell<TestWorld>, name: String, content: String) {
    let mut w = world.borrow_mut();
    let target = w
        .workspace
        .existing(strip_quotes(&name), strip_quotes(&content).as_bytes(), 0o644);
    w.target = Some(target);
}

#[given("the target has mode {mode}")]
fn given_mode(world: &RefCell<TestWorld>, mode: String) {
    let w = world.borrow();
    let bits = u32::from_str_radix(&mode, 8).expect("octal mode");
    fs::set_permissions(target_path(&w), fs::Permissions::from_mode(bits)).expect("chmod");
}

#[given("validation uses the JSON checker")]
fn given_json_checker(world: &RefCell<TestWorld>) {
    world.borrow_mut().checker = Some(Arc::new(JsonChecker));
}

#[given("the editor leaves the file unchanged")]
fn given_editor_keeps(world: &RefCell<TestWorld>) {
    world.borrow_mut().steps.push(EditStep::Keep);
}

#[given("the editor writes {content}")]
fn given_editor_writes(world: &RefCell<TestWorld>, content: String) {
    let bytes = strip_quotes(&content).as_bytes().to_vec();
    world.borrow_mut().steps.push(EditStep::Write(bytes));
}

#[given("the editor exits with status {code}")]
fn given_editor_fails(world: &RefCell<TestWorld>, code: i32) {
    world.borrow_mut().steps.push(EditStep::Fail(code));
}

#[given("the editor is interrupted")]
fn given_editor_interrupted(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let flag = w.interrupt.clone();
    w.steps.push(EditStep::Interrupt(flag));
}

#[given("the editor starts at line {line}")]
fn given_line(world: &RefCell<TestWorld>, line: u32) {
    world.borrow_mut().line = Some(line);
}

#[given("the user answers {answer}")]
fn given_answer(world: &RefCell<TestWorld>, answer: String) {
    let decision = Decision::parse(strip_quotes(&answer)).expect("known answer");
    world.borrow_mut().decisions.push(decision);
}

// =============================================================================
// When Steps
// =============================================================================

#[when("the session runs")]
fn when_session_runs(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let target = w.target.clone().expect("target should be set");
    let editor = ScriptedEditor::new(w.steps.clone());
    let command = editor_command();
    let mut prompter = ScriptedPrompter::new().with_decisions(w.decisions.clone());
    let mut reporter = RecordingReporter::default();

    let result = EditSession::new(target, &command, &editor)
        .with_checker(w.checker.clone())
        .with_line(w.line)
        .with_interrupt(w.interrupt.clone())
        .run(&mut prompter, &mut reporter);

    w.prompted = prompter.failures().iter().map(|f| f.kind()).collect();
    w.invocations = editor.invocations();
    w.result = Some(result);
}

// =============================================================================
// Then Steps
// =============================================================================

fn outcome(world: &TestWorld) -> SessionOutcome {
    match world.result.as_ref().expect("session should have run") {
        Ok(outcome) => *outcome,
        Err(err) => panic!("session failed: {err}"),
    }
}

#[then("the session commits")]
fn then_commits(world: &RefCell<TestWorld>) {
    assert!(outcome(&world.borrow()).committed());
}

#[then("the session aborts")]
fn then_aborts(world: &RefCell<TestWorld>) {
    assert!(matches!(
        outcome(&world.borrow()),
        SessionOutcome::Aborted { .. }
    ));
}

#[then("the session fails with an editor error")]
fn then_editor_error(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let result = w.result.as_ref().expect("session should have run");
    assert!(
        matches!(result, Err(SessionError::EditorProcess { .. })),
        "expected editor error, got {result:?}"
    );
}

#[then("the user was shown a syntax failure")]
fn then_syntax_failure(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().prompted, [FailureKind::Syntax]);
}

#[then("the target contains {content}")]
fn then_target_contains(world: &RefCell<TestWorld>, content: String) {
    let w = world.borrow();
    let actual = fs::read_to_string(target_path(&w)).expect("read target");
    assert_eq!(actual, strip_quotes(&content));
}

#[then("the target has mode {mode}")]
fn then_target_mode(world: &RefCell<TestWorld>, mode: String) {
    let w = world.borrow();
    let bits = u32::from_str_radix(&mode, 8).expect("octal mode");
    assert_eq!(mode_of(&target_path(&w)), bits);
}

#[then("no staging file remains")]
fn then_no_staging(world: &RefCell<TestWorld>) {
    assert!(world.borrow().workspace.leftovers().is_empty());
}

#[then("the editor was opened {count} times")]
fn then_editor_count(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().invocations.len(), count);
}

#[then("only the first edit received line {line}")]
fn then_line_hint(world: &RefCell<TestWorld>, line: u32) {
    let w = world.borrow();
    let (first, rest) = w.invocations.split_first().expect("at least one edit");
    assert_eq!(first.line, Some(line));
    assert!(rest.iter().all(|call| call.line.is_none()));
}
