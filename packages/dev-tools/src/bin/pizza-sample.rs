//! Pizza ordering sample
//!
//! Compiles an application manifest, authors it against the in-process NLU
//! service, trains, publishes and prints the prediction for one query.
//!
//! # Usage
//!
//! ```bash
//! # Built-in Contoso Pizza Company manifest
//! cargo run --bin pizza-sample
//!
//! # Your own manifest and query
//! NLUFORGE_MANIFEST=./coffee.json NLUFORGE_QUERY="two lattes please" cargo run --bin pizza-sample
//! ```
//!
//! # Configuration
//!
//! `NLUFORGE_*` variables (see `AuthoringConfig::from_env`) tune culture, slot,
//! nesting and training polling. Log level follows `RUST_LOG`, default `info`.

use anyhow::Context;
use nluforge_core::AppManifest;
use nluforge_nlu_client::{run_authoring_workflow, AuthoringConfig, LocalNluService};

const DEFAULT_QUERY: &str = "I want two small pepperoni pizzas with more salsa";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AuthoringConfig::from_env().context("Invalid NLUFORGE_* configuration")?;

    let manifest = match std::env::var("NLUFORGE_MANIFEST") {
        Ok(path) => AppManifest::load(&path)
            .with_context(|| format!("Failed to load manifest from {}", path))?,
        Err(_) => AppManifest::contoso_pizza(),
    };
    let query = std::env::var("NLUFORGE_QUERY").unwrap_or_else(|_| DEFAULT_QUERY.to_string());

    let app = manifest
        .compile()
        .with_context(|| format!("Manifest '{}' failed validation", manifest.name))?;
    tracing::info!(
        "Compiled '{}' v{}: {} schema(s), {} example(s)",
        app.name,
        app.version_id,
        app.schemas.len(),
        app.examples.len()
    );

    let service = LocalNluService::new();
    let outcome = run_authoring_workflow(&service, &app, &config, &query).await?;

    println!("New app ID {}.", outcome.app_id);
    println!("{}", outcome.prediction.to_json_pretty()?);

    Ok(())
}
