use serde::Serialize;
use serde_json::json;

use saga_engine::action::example_action::ProvisionStep;
use saga_engine::{ActionSpec, Task};

#[derive(Serialize)]
struct ProjectSettings {
    name: String,
    services: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging if needed.
    env_logger::init();
    println!("Starting the saga engine demo...");

    // Step 1: Seed the initial state with typed project settings.
    let settings = ProjectSettings {
        name: "demo-project".into(),
        services: vec!["web".into(), "db".into()],
    };
    let initial = json!({ "project": serde_json::to_value(&settings)? });

    // Step 2: Compose a provisioning-flavored workflow. The two gated
    // steps start as soon as the clone completes, concurrently with the
    // rest of the first stage.
    let task = Task::new()
        .then([
            ActionSpec::named(
                "clone",
                ProvisionStep {
                    name: "clone repository".into(),
                    output_path: "repo.cloned".into(),
                    fail: false,
                },
            ),
            ActionSpec::run(ProvisionStep {
                name: "pull base images".into(),
                output_path: "images.pulled".into(),
                fail: false,
            }),
        ])
        .after(
            "clone",
            [
                ActionSpec::run(ProvisionStep {
                    name: "write configuration".into(),
                    output_path: "config.written".into(),
                    fail: false,
                }),
                ActionSpec::run(ProvisionStep {
                    name: "compose services".into(),
                    output_path: "services.composed".into(),
                    fail: false,
                }),
            ],
        )
        .if_then(
            |state| state.get("project.services") != json!([]),
            [ActionSpec::run(ProvisionStep {
                name: "start services".into(),
                output_path: "services.started".into(),
                fail: false,
            })],
        );

    // Step 3: Execute the workflow and print the final state.
    let state = task.start(initial).await?;
    println!(
        "Workflow finished:\n{}",
        serde_json::to_string_pretty(&state.snapshot())?
    );

    // Step 4: Demonstrate the rollback path with a failing final step.
    let failing = Task::new()
        .then([ActionSpec::run(ProvisionStep {
            name: "write configuration".into(),
            output_path: "config.written".into(),
            fail: false,
        })])
        .then([ActionSpec::run(ProvisionStep {
            name: "compose services".into(),
            output_path: "services.composed".into(),
            fail: true,
        })]);

    match failing.start(json!({})).await {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Workflow failed and rolled back: {}", e),
    }

    Ok(())
}
