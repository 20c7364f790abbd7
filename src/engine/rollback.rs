use log::{debug, error, info};

use super::context::CompletionLog;
use crate::state::StateStore;

/// Reverts every previously completed action in reverse-completion (LIFO)
/// order, the conventional compensating-transaction order.
///
/// Revert failures are logged and never re-thrown, so they cannot mask
/// the original failure or stop the remaining reverts.
pub(crate) async fn revert_completed(completed: &CompletionLog, store: &StateStore) {
    let entries = completed.drain_reverse();
    if entries.is_empty() {
        return;
    }

    info!("rolling back {} completed action(s)", entries.len());
    for entry in entries {
        debug!("reverting action '{}'", entry.label);
        if let Err(e) = entry.action.revert(store).await {
            error!("revert of action '{}' failed: {}", entry.label, e);
        }
    }
}
