/// NluForge NLU Client - Authoring against an NLU service
///
/// This crate takes a compiled application from `nluforge-core` and submits it
/// to an NLU service: create the application, register intents, entities,
/// phrase lists and features, add labeled examples, train, publish and query.
///
/// # Features
///
/// - **Service Contract**: `NluService` trait covering every authoring call
/// - **In-Process Service**: `LocalNluService` enforces the same rules a hosted
///   service would and simulates asynchronous training
/// - **Bounded Polling**: training status is checked with exponential backoff
///   and an overall timeout
/// - **Environment Configuration**: `NLUFORGE_*` variables override defaults
///
/// # Example
///
/// ```
/// use nluforge_core::AppManifest;
/// use nluforge_nlu_client::{run_authoring_workflow, AuthoringConfig, LocalNluService};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let app = AppManifest::contoso_pizza().compile()?;
///     let config = AuthoringConfig {
///         poll_initial_interval_ms: 1,
///         poll_max_interval_ms: 10,
///         ..AuthoringConfig::default()
///     };
///
///     let service = LocalNluService::new();
///     let outcome = run_authoring_workflow(
///         &service,
///         &app,
///         &config,
///         "I want two small pepperoni pizzas with more salsa",
///     )
///     .await?;
///
///     assert_eq!(
///         outcome.prediction.prediction.top_intent.as_deref(),
///         Some("OrderPizzaIntent")
///     );
///     Ok(())
/// }
/// ```
pub mod config;
pub mod error;
pub mod local;
pub mod service;
pub mod training;
pub mod types;
pub mod workflow;

// Re-export main types
pub use config::AuthoringConfig;
pub use error::{NluServiceError, Result};
pub use local::{LocalNluService, VersionSummary};
pub use service::NluService;
pub use training::TrainingPoller;
pub use types::*;
pub use workflow::{run_authoring_workflow, AuthoringOutcome};
