use std::sync::Arc;

use super::task::Task;
use crate::action::Action;
use crate::state::StateStore;

/// One entry in a stage: run an anonymous action, run and register a named
/// action, or wait on a previously registered one.
pub struct ActionSpec {
    pub(crate) kind: SpecKind,
}

pub(crate) enum SpecKind {
    /// Runs the action; its result is unreferenceable by later stages.
    Anonymous {
        label: &'static str,
        action: Arc<dyn Action>,
    },
    /// Runs the action and registers it into the reference map, so later
    /// stages and gated sub-tasks can wait on this exact action.
    Named {
        name: String,
        action: Arc<dyn Action>,
    },
    /// Waits on an already-registered action without re-running it.
    Reference { name: String },
}

impl ActionSpec {
    pub fn run<A: Action + 'static>(action: A) -> Self {
        Self {
            kind: SpecKind::Anonymous {
                label: short_type_name::<A>(),
                action: Arc::new(action),
            },
        }
    }

    pub fn named<A: Action + 'static>(name: impl Into<String>, action: A) -> Self {
        Self {
            kind: SpecKind::Named {
                name: name.into(),
                action: Arc::new(action),
            },
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            kind: SpecKind::Reference { name: name.into() },
        }
    }
}

/// Label used in logs and errors for anonymous actions.
fn short_type_name<A>() -> &'static str {
    let full = std::any::type_name::<A>();
    full.rsplit("::").next().unwrap_or(full)
}

pub(crate) type Predicate = Box<dyn Fn(&StateStore) -> bool + Send + Sync>;

/// One step of a task's main list.
pub(crate) enum Stage {
    /// A set of specs run concurrently; the stage joins all of them before
    /// the task advances.
    Run(Vec<ActionSpec>),
    /// A conditional evaluated against the state store when execution
    /// reaches it. Exactly one arm runs.
    Branch {
        predicate: Predicate,
        when_true: Task,
        when_false: Option<Task>,
    },
}

/// Accepts a single name or a collection of names for `after`.
pub trait BlockingRefs {
    fn into_names(self) -> Vec<String>;
}

impl BlockingRefs for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl BlockingRefs for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl BlockingRefs for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

impl BlockingRefs for Vec<&str> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl<const N: usize> BlockingRefs for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}
