use futures::future::join_all;
use log::{debug, error, info};
use std::collections::HashSet;
use std::sync::Arc;

use super::context::{GatedSubTask, ReferenceState, RunContext};
use super::error::EngineError;
use super::spec::{ActionSpec, SpecKind};
use super::task::Task;
use crate::action::Action;

/// Runs one concurrent stage: instantiates every spec, joins all of them
/// (the stage barrier), then records the first failure in declaration
/// order into the shared failure slot.
pub(crate) async fn run_stage(specs: Vec<ActionSpec>, ctx: &RunContext) {
    // A stage with zero specs is legal and resolves immediately.
    if specs.is_empty() {
        return;
    }

    let mut work = Vec::with_capacity(specs.len());
    for spec in specs {
        work.push(run_spec(spec, ctx));
    }

    let results = join_all(work).await;
    for result in results {
        if let Err(err) = result {
            ctx.failure.record(err);
            break;
        }
    }
}

async fn run_spec(spec: ActionSpec, ctx: &RunContext) -> Result<(), EngineError> {
    match spec.kind {
        SpecKind::Anonymous { label, action } => {
            run_action(label.to_string(), action, None, ctx).await
        }
        SpecKind::Named { name, action } => {
            ctx.references.register(&name);
            run_action(name.clone(), action, Some(name), ctx).await
        }
        SpecKind::Reference { name } => {
            let Some(mut rx) = ctx.references.subscribe(&name) else {
                return Err(EngineError::UnknownReference { name });
            };
            // Wait for the referenced action to settle. If it failed, its
            // own stage reports the failure; this waiter just unblocks.
            let _ = rx.wait_for(|s| *s != ReferenceState::Pending).await;
            Ok(())
        }
    }
}

/// Drives one action's `complete`, then records completion and settles
/// its reference. Settlement happens as soon as this action finishes,
/// inside the stage barrier, so gated sub-tasks unlock mid-stage.
async fn run_action(
    label: String,
    action: Arc<dyn Action>,
    reference: Option<String>,
    ctx: &RunContext,
) -> Result<(), EngineError> {
    info!("action '{}' starting", label);

    match action.complete(&ctx.store).await {
        Ok(()) => {
            info!("action '{}' completed", label);
            ctx.completed.record(label, action);
            if let Some(name) = reference {
                ctx.references.settle(&name, ReferenceState::Completed);
                unlock_gated(&name, ctx);
            }
            Ok(())
        }
        Err(source) => {
            error!("action '{}' failed: {}", label, source);
            if let Some(name) = reference {
                ctx.references.settle(&name, ReferenceState::Failed);
            }
            Err(EngineError::ActionFailed { label, source })
        }
    }
}

/// Registers a task's gated sub-tasks with the run. References that have
/// already completed do not block; a sub-task whose blocking set is
/// already empty starts immediately.
pub(crate) fn enqueue_gated(entries: Vec<(Vec<String>, Task)>, ctx: &RunContext) {
    let mut ready = Vec::new();
    {
        let mut gated = ctx.gated.lock().unwrap();
        for (names, task) in entries {
            let mut remaining = HashSet::new();
            for name in names {
                if ctx.references.state(&name) != Some(ReferenceState::Completed) {
                    remaining.insert(name);
                }
            }
            if remaining.is_empty() {
                ready.push(task);
            } else {
                gated.push(GatedSubTask {
                    remaining,
                    task: Some(task),
                });
            }
        }
    }

    for task in ready {
        spawn_sub_task(task, ctx);
    }
}

/// Removes `name` from every gated sub-task's blocking set and spawns the
/// ones whose set became empty. Called when the action named `name`
/// completes.
fn unlock_gated(name: &str, ctx: &RunContext) {
    let mut ready = Vec::new();
    {
        let mut gated = ctx.gated.lock().unwrap();
        for entry in gated.iter_mut() {
            if entry.remaining.remove(name) && entry.remaining.is_empty() {
                if let Some(task) = entry.task.take() {
                    ready.push(task);
                }
            }
        }
    }

    for task in ready {
        spawn_sub_task(task, ctx);
    }
}

/// Starts a gated sub-task, concurrent with whatever stage the declaring
/// task is still draining. Nothing new is started once a failure is
/// recorded.
fn spawn_sub_task(task: Task, ctx: &RunContext) {
    if ctx.failure.halted() {
        debug!("skipping gated sub-task, run already failed");
        return;
    }

    debug!("starting gated sub-task");
    // The guard keeps the run's liveness channel open until this sub-task
    // (and anything it spawns in turn) has settled.
    let guard = ctx.live.clone();
    let ctx = ctx.clone();
    tokio::spawn(async move {
        task.run(ctx).await;
        drop(guard);
    });
}
