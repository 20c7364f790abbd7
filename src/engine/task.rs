use futures::future::BoxFuture;
use log::{debug, info};
use serde_json::Value;
use tokio::sync::mpsc;

use super::context::{CompletionLog, FailureSlot, ReferenceMap, RunContext};
use super::error::EngineError;
use super::executor;
use super::rollback;
use super::spec::{ActionSpec, BlockingRefs, Stage};
use super::validation;
use crate::state::StateStore;

/// A composable graph of stages, executed exactly once via [`start`].
///
/// Declaration is pure graph construction; nothing runs until `start`.
/// Stages run in order with a barrier between them; every spec within a
/// stage runs concurrently. Gated sub-tasks declared with [`after`] do not
/// join the main list: they start the moment all of their blocking
/// references complete, concurrent with whatever stage is still draining.
///
/// [`start`]: Task::start
/// [`after`]: Task::after
pub struct Task {
    pub(crate) stages: Vec<Stage>,
    pub(crate) gated: Vec<(Vec<String>, Task)>,
    pub(crate) dangling_otherwise: bool,
}

impl Task {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            gated: Vec::new(),
            dangling_otherwise: false,
        }
    }

    /// Appends a stage whose specs run concurrently. The task does not
    /// advance past the stage until every spec has settled.
    pub fn then(mut self, specs: impl IntoIterator<Item = ActionSpec>) -> Self {
        self.stages.push(Stage::Run(specs.into_iter().collect()));
        self
    }

    /// Declares a sub-task blocked on one or more reference names. It is
    /// not part of the main stage list: it starts as soon as every named
    /// action has completed, even mid-stage.
    pub fn after(
        self,
        names: impl BlockingRefs,
        specs: impl IntoIterator<Item = ActionSpec>,
    ) -> Self {
        self.after_task(names, Task::new().then(specs))
    }

    /// Like [`after`](Task::after), but gates a fully built multi-stage
    /// sub-task.
    pub fn after_task(mut self, names: impl BlockingRefs, task: Task) -> Self {
        self.gated.push((names.into_names(), task));
        self
    }

    /// Appends a conditional stage. The predicate is evaluated against the
    /// state store at the moment execution reaches this stage; the specs
    /// run only when it returns true.
    pub fn if_then(
        mut self,
        predicate: impl Fn(&StateStore) -> bool + Send + Sync + 'static,
        specs: impl IntoIterator<Item = ActionSpec>,
    ) -> Self {
        self.stages.push(Stage::Branch {
            predicate: Box::new(predicate),
            when_true: Task::new().then(specs),
            when_false: None,
        });
        self
    }

    /// Attaches the false-branch to the immediately preceding `if_then`.
    /// Calling it anywhere else is a configuration error surfaced by
    /// `start` before anything runs.
    pub fn otherwise(mut self, specs: impl IntoIterator<Item = ActionSpec>) -> Self {
        match self.stages.last_mut() {
            Some(Stage::Branch {
                when_false: slot @ None,
                ..
            }) => {
                *slot = Some(Task::new().then(specs));
            }
            _ => {
                self.dangling_otherwise = true;
            }
        }
        self
    }

    /// Runs the task to completion. Resolves with the final state store,
    /// or rejects with the first failure after reverting every action
    /// that had already completed.
    ///
    /// `start` is terminal; a `Task` is consumed and not restartable.
    pub async fn start(self, initial: Value) -> Result<StateStore, EngineError> {
        validation::validate_task(&self)?;

        let store = StateStore::new(initial);
        let (live, mut idle) = mpsc::unbounded_channel::<()>();
        let ctx = RunContext {
            store: store.clone(),
            references: ReferenceMap::new(),
            gated: Default::default(),
            completed: CompletionLog::new(),
            failure: FailureSlot::new(),
            live,
        };
        let completed = ctx.completed.clone();
        let failure = ctx.failure.clone();

        info!("starting workflow with {} stage(s)", self.stages.len());
        self.run(ctx).await;

        // Every spawned sub-task holds a clone of the context's liveness
        // sender; the channel closes once the last one finishes.
        let _ = idle.recv().await;

        match failure.take() {
            Some(err) => {
                rollback::revert_completed(&completed, &store).await;
                Err(err)
            }
            None => Ok(store),
        }
    }

    /// Drains this task's stages against a shared run context. Errors are
    /// recorded into the context's failure slot; once one is present, no
    /// further stages are scheduled.
    pub(crate) fn run(self, ctx: RunContext) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let Task { stages, gated, .. } = self;

            executor::enqueue_gated(gated, &ctx);

            for stage in stages {
                if ctx.failure.halted() {
                    debug!("run failed, not scheduling further stages");
                    break;
                }

                match stage {
                    Stage::Run(specs) => executor::run_stage(specs, &ctx).await,
                    Stage::Branch {
                        predicate,
                        when_true,
                        when_false,
                    } => {
                        if predicate(&ctx.store) {
                            debug!("conditional stage passed");
                            when_true.run(ctx.clone()).await;
                        } else if let Some(arm) = when_false {
                            debug!("conditional stage did not pass, running otherwise");
                            arm.run(ctx.clone()).await;
                        } else {
                            debug!("conditional stage did not pass");
                        }
                    }
                }
            }
        })
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}
