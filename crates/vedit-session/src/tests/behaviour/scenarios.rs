//! Scenario bindings for the edit session feature file.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "An unchanged edit preserves bytes and permissions"
)]
fn unchanged_edit_round_trips(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "Quitting after a JSON syntax error leaves the target untouched"
)]
fn quit_after_syntax_error(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "Saving anyway commits invalid JSON"
)]
fn save_anyway_commits(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "A failing editor aborts the session"
)]
fn failing_editor_aborts(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "The line hint only applies to the first edit"
)]
fn line_hint_first_edit_only(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/edit_session.feature",
    name = "An interrupt while editing discards the working copy"
)]
fn interrupt_discards_working_copy(world: RefCell<TestWorld>) {
    drop(world);
}
