use async_trait::async_trait;
use std::error::Error;

use crate::state::StateStore;

pub mod example_action;

#[cfg(test)]
mod tests;

/// The atomic unit of work in a workflow.
///
/// `complete` is mandatory and performs the action's one asynchronous
/// operation against the shared state. `revert` undoes its side effects
/// (delete a created directory, kill a spawned process) and defaults to a
/// no-op; the scheduler calls it only on actions whose `complete`
/// previously succeeded, and only when the run subsequently fails.
///
/// All side effects live inside `complete`/`revert`; actions never talk to
/// each other directly, only through the [`StateStore`] and the
/// scheduler's completion signals.
#[async_trait]
pub trait Action: Send + Sync {
    async fn complete(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn revert(&self, _state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
