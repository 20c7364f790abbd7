//! # Saga Engine
//!
//! An asynchronous, in-process task orchestration engine for Rust that
//! sequences interdependent units of work and compensates for failure by
//! rolling back everything that had already completed.
//!
//! ## Features
//!
//! - Compose workflows out of stages of concurrently-running actions
//! - Gate sub-tasks on specifically named actions, not whole stages
//! - Runtime conditional branches (`if_then` / `otherwise`)
//! - Shared, dot-path-addressable state store threaded through the run
//! - Compensating rollback of every completed action on failure
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use saga_engine::{Action, ActionSpec, StateStore, Task};
//! use serde_json::json;
//! use std::error::Error;
//!
//! struct Download;
//!
//! #[async_trait]
//! impl Action for Download {
//!     async fn complete(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
//!         state.set("files.ready", true);
//!         Ok(())
//!     }
//! }
//!
//! struct WriteConfig;
//!
//! #[async_trait]
//! impl Action for WriteConfig {
//!     async fn complete(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
//!         state.set("config.written", true);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let task = Task::new()
//!         .then([ActionSpec::named("download", Download)])
//!         .after("download", [ActionSpec::run(WriteConfig)]);
//!
//!     let state = task.start(json!({})).await.expect("workflow failed");
//!     assert_eq!(state.get("files.ready"), json!(true));
//!     assert_eq!(state.get("config.written"), json!(true));
//! }
//! ```
//!
//! ## License
//!
//! Licensed under the MIT license. See the [LICENSE](LICENSE) file for details.

pub mod action;
pub mod engine;
pub mod state;

pub use action::Action;
pub use engine::{ActionSpec, BlockingRefs, EngineError, Task};
pub use state::StateStore;
