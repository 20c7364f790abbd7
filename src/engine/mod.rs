mod context;
mod error;
mod executor;
mod rollback;
mod spec;
mod task;
mod validation;

pub use error::EngineError;
pub use spec::{ActionSpec, BlockingRefs};
pub use task::Task;
