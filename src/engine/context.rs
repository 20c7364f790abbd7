use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

use super::error::EngineError;
use super::task::Task;
use crate::action::Action;
use crate::state::StateStore;

/// Terminal outcome of a named action, observed through its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReferenceState {
    Pending,
    Completed,
    Failed,
}

/// Name -> settlement signal for every named action instantiated so far.
///
/// Entries are created when a named spec is instantiated; waiters
/// subscribe to the watch channel and resolve once the action settles.
#[derive(Clone)]
pub(crate) struct ReferenceMap {
    inner: Arc<Mutex<HashMap<String, watch::Sender<ReferenceState>>>>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers `name` as pending. A re-registered name replaces the
    /// previous entry.
    pub fn register(&self, name: &str) {
        let (tx, _rx) = watch::channel(ReferenceState::Pending);
        self.inner.lock().unwrap().insert(name.to_string(), tx);
    }

    pub fn settle(&self, name: &str, state: ReferenceState) {
        if let Some(tx) = self.inner.lock().unwrap().get(name) {
            tx.send_replace(state);
        }
    }

    /// Current state of `name`, or `None` if it was never registered.
    pub fn state(&self, name: &str) -> Option<ReferenceState> {
        self.inner
            .lock()
            .unwrap()
            .get(name)
            .map(|tx| *tx.borrow())
    }

    pub fn subscribe(&self, name: &str) -> Option<watch::Receiver<ReferenceState>> {
        self.inner
            .lock()
            .unwrap()
            .get(name)
            .map(|tx| tx.subscribe())
    }
}

/// A gated sub-task and the references still blocking it. The task is
/// taken out when the remaining set empties; entries that never unlock
/// are discarded when the run finishes.
pub(crate) struct GatedSubTask {
    pub remaining: HashSet<String>,
    pub task: Option<Task>,
}

/// An action whose `complete` succeeded, kept for compensating rollback.
pub(crate) struct CompletedAction {
    pub label: String,
    pub action: Arc<dyn Action>,
}

/// Completion-ordered log of successful actions.
#[derive(Clone)]
pub(crate) struct CompletionLog {
    inner: Arc<Mutex<Vec<CompletedAction>>>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, label: String, action: Arc<dyn Action>) {
        self.inner
            .lock()
            .unwrap()
            .push(CompletedAction { label, action });
    }

    /// Drains the log in reverse-completion (LIFO) order for rollback.
    pub fn drain_reverse(&self) -> Vec<CompletedAction> {
        let mut entries: Vec<CompletedAction> =
            self.inner.lock().unwrap().drain(..).collect();
        entries.reverse();
        entries
    }
}

/// First-failure slot. Once set, the scheduler stops starting new stages
/// and new sub-tasks; in-flight actions still run to settlement.
#[derive(Clone)]
pub(crate) struct FailureSlot {
    error: Arc<Mutex<Option<EngineError>>>,
}

impl FailureSlot {
    pub fn new() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Records `err` unless a failure was already recorded; later failures
    /// are logged by their own call sites but never replace the first.
    pub fn record(&self, err: EngineError) {
        let mut slot = self.error.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    pub fn halted(&self) -> bool {
        self.error.lock().unwrap().is_some()
    }

    pub fn take(&self) -> Option<EngineError> {
        self.error.lock().unwrap().take()
    }
}

/// Everything one run shares across its stages, branch arms, and gated
/// sub-tasks. Cloned into every spawned sub-task; the `live` sender
/// doubles as a liveness guard, `Task::start` waits for the channel to
/// close before it resolves or rolls back.
#[derive(Clone)]
pub(crate) struct RunContext {
    pub store: StateStore,
    pub references: ReferenceMap,
    pub gated: Arc<Mutex<Vec<GatedSubTask>>>,
    pub completed: CompletionLog,
    pub failure: FailureSlot,
    pub live: mpsc::UnboundedSender<()>,
}
