use std::error::Error;

/// Errors surfaced by a workflow run.
///
/// Revert failures are deliberately absent: a failing `revert` is logged
/// and never re-thrown, so it cannot mask the original failure.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An action's asynchronous operation rejected. Triggers rollback of
    /// every previously completed action and terminates the run.
    #[error("action '{label}' failed: {source}")]
    ActionFailed {
        label: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// A stage or gated sub-task names a reference that was never
    /// declared. A configuration error, raised before any action runs.
    #[error("reference '{name}' is not declared anywhere in this task")]
    UnknownReference { name: String },

    /// `otherwise` was called without an immediately preceding `if_then`.
    #[error("'otherwise' must immediately follow an 'if_then' stage")]
    DanglingOtherwise,
}
