use crate::action::Action;
use super::validate_task;
use crate::engine::{ActionSpec, EngineError, Task};
use crate::state::StateStore;
use async_trait::async_trait;
use std::error::Error;

struct Noop;

#[async_trait]
impl Action for Noop {
    async fn complete(&self, _state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

#[test]
fn test_declared_reference_passes() {
    let task = Task::new()
        .then([ActionSpec::named("download", Noop)])
        .after("download", [ActionSpec::run(Noop)]);

    assert!(validate_task(&task).is_ok());
}

#[test]
fn test_unknown_gating_reference_is_rejected() {
    let task = Task::new()
        .then([ActionSpec::named("download", Noop)])
        .after("ghost", [ActionSpec::run(Noop)]);

    match validate_task(&task) {
        Err(EngineError::UnknownReference { name }) => assert_eq!(name, "ghost"),
        other => panic!("expected UnknownReference, got {:?}", other),
    }
}

#[test]
fn test_unknown_reference_spec_is_rejected() {
    let task = Task::new()
        .then([ActionSpec::named("a", Noop)])
        .then([ActionSpec::reference("b")]);

    match validate_task(&task) {
        Err(EngineError::UnknownReference { name }) => assert_eq!(name, "b"),
        other => panic!("expected UnknownReference, got {:?}", other),
    }
}

#[test]
fn test_name_declared_inside_branch_counts() {
    let task = Task::new()
        .if_then(|_| true, [ActionSpec::named("inner", Noop)])
        .after("inner", [ActionSpec::run(Noop)]);

    assert!(validate_task(&task).is_ok());
}

#[test]
fn test_name_declared_inside_gated_sub_task_counts() {
    let task = Task::new()
        .then([ActionSpec::named("a", Noop)])
        .after("a", [ActionSpec::named("b", Noop)])
        .after("b", [ActionSpec::run(Noop)]);

    assert!(validate_task(&task).is_ok());
}

#[test]
fn test_otherwise_without_if_then_is_rejected() {
    let task = Task::new()
        .then([ActionSpec::run(Noop)])
        .otherwise([ActionSpec::run(Noop)]);

    assert!(matches!(
        validate_task(&task),
        Err(EngineError::DanglingOtherwise)
    ));
}

#[test]
fn test_double_otherwise_is_rejected() {
    let task = Task::new()
        .if_then(|_| true, [ActionSpec::run(Noop)])
        .otherwise([ActionSpec::run(Noop)])
        .otherwise([ActionSpec::run(Noop)]);

    assert!(matches!(
        validate_task(&task),
        Err(EngineError::DanglingOtherwise)
    ));
}
