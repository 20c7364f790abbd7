use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;

use crate::action::Action;
use crate::state::StateStore;

/// A simple action used by the demo binary: marks a state path when done,
/// clears it again on rollback.
pub struct ProvisionStep {
    pub name: String,
    pub output_path: String,
    pub fail: bool,
}

#[async_trait]
impl Action for ProvisionStep {
    async fn complete(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("Provisioning {}", self.name);
        // Simulate some asynchronous work.
        tokio::time::sleep(Duration::from_millis(200)).await;
        if self.fail {
            eprintln!("Simulated failure in {}", self.name);
            Err(format!("simulated failure in {}", self.name).into())
        } else {
            state.set(&self.output_path, true);
            println!("Finished {}", self.name);
            Ok(())
        }
    }

    async fn revert(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("Rolling back {}", self.name);
        state.set(&self.output_path, false);
        Ok(())
    }
}
