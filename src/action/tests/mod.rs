use crate::action::example_action::ProvisionStep;
use crate::action::Action;
use crate::state::StateStore;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::error::Error;

struct BareAction;

#[async_trait]
impl Action for BareAction {
    async fn complete(&self, state: &StateStore) -> Result<(), Box<dyn Error + Send + Sync>> {
        state.set("done", true);
        Ok(())
    }
}

#[tokio::test]
async fn test_default_revert_is_a_no_op() {
    let store = StateStore::new(json!({}));
    let action = BareAction;

    action.complete(&store).await.unwrap();
    assert_eq!(store.get("done"), json!(true));

    // BareAction does not override revert; the default leaves state alone.
    action.revert(&store).await.unwrap();
    assert_eq!(store.get("done"), json!(true));
}

#[tokio::test]
async fn test_example_action_success_and_rollback() {
    let store = StateStore::new(json!({}));
    let step = ProvisionStep {
        name: "clone".into(),
        output_path: "repo.cloned".into(),
        fail: false,
    };

    step.complete(&store).await.unwrap();
    assert_eq!(store.get("repo.cloned"), json!(true));

    step.revert(&store).await.unwrap();
    assert_eq!(store.get("repo.cloned"), json!(false));
}

#[tokio::test]
async fn test_example_action_failure_writes_nothing() {
    let store = StateStore::new(json!({}));
    let step = ProvisionStep {
        name: "clone".into(),
        output_path: "repo.cloned".into(),
        fail: true,
    };

    let result = step.complete(&store).await;
    assert!(result.is_err());
    assert_eq!(store.get("repo.cloned"), Value::Null);
}
