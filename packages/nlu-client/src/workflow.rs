//! End-to-end authoring workflow
//!
//! Submits a [`CompiledApp`] to an [`NluService`], trains it, publishes it and
//! runs one prediction. Every artifact is validated locally before this point,
//! so service-side rejections here indicate a service/manifest mismatch rather
//! than a malformed schema.

use crate::config::AuthoringConfig;
use crate::error::{NluServiceError, Result};
use crate::service::NluService;
use crate::training::TrainingPoller;
use crate::types::{
    AppId, AppInfoRequest, ModelTrainingStatus, PredictionResponse, PublishedSlot,
    RemoteEntityModel,
};
use nluforge_core::{CompiledApp, EntityNode};

/// Everything produced by one authoring run
#[derive(Debug, Clone)]
pub struct AuthoringOutcome {
    pub app_id: AppId,
    pub version_id: String,
    pub entity_models: Vec<RemoteEntityModel>,
    pub feature_count: usize,
    pub example_count: usize,
    pub training: Vec<ModelTrainingStatus>,
    pub published: PublishedSlot,
    pub prediction: PredictionResponse,
}

pub async fn run_authoring_workflow<S>(
    service: &S,
    app: &CompiledApp,
    config: &AuthoringConfig,
    query: &str,
) -> Result<AuthoringOutcome>
where
    S: NluService + ?Sized,
{
    config.validate().map_err(NluServiceError::ConfigError)?;
    let version_id = app.version_id.as_str();

    let request = AppInfoRequest {
        name: app.name.clone(),
        culture: app.culture.clone().unwrap_or_else(|| config.culture.clone()),
        initial_version_id: app.version_id.clone(),
        description: app.description.clone(),
    };
    let app_id = service.create_app(&request).await?;
    tracing::info!("Created application '{}' ({})", app.name, app_id);

    for intent in &app.intents {
        service.add_intent(app_id, version_id, intent).await?;
    }
    if !app.prebuilt_entities.is_empty() {
        service
            .add_prebuilts(app_id, version_id, &app.prebuilt_entities)
            .await?;
    }
    tracing::info!(
        "Added {} intent(s) and {} prebuilt(s)",
        app.intents.len(),
        app.prebuilt_entities.len()
    );

    let mut entity_models = Vec::with_capacity(app.schemas.len());
    for schema in &app.schemas {
        let model = service.add_entity(app_id, version_id, schema).await?;
        tracing::info!(
            "Added entity '{}' with {} node(s)",
            schema.name(),
            schema.node_count()
        );
        entity_models.push(model);
    }

    // Phrase lists must exist before features can reference them
    for phrase_list in &app.phrase_lists {
        service
            .add_phrase_list(app_id, version_id, phrase_list)
            .await?;
    }

    let mut feature_count = 0;
    for (schema, model) in app.schemas.iter().zip(&entity_models) {
        feature_count += submit_features(service, app_id, version_id, schema, model).await?;
    }
    tracing::info!(
        "Added {} phrase list(s) and {} feature(s)",
        app.phrase_lists.len(),
        feature_count
    );

    for example in &app.examples {
        service
            .add_example(app_id, version_id, example, config.enable_nested_children)
            .await?;
    }
    tracing::info!("Added {} labeled example(s)", app.examples.len());

    service.train_version(app_id, version_id).await?;
    tracing::info!("Training v{}...", version_id);
    let training = TrainingPoller::from_config(config)
        .wait_until_trained(service, app_id, version_id)
        .await?;
    tracing::info!("Trained {} model(s)", training.len());

    let published = service
        .publish(app_id, version_id, &config.slot_name, false)
        .await?;
    tracing::info!("Published v{} to '{}'", version_id, published.slot_name);

    let prediction = service.predict(app_id, &config.slot_name, query).await?;
    tracing::info!(
        "Top intent for '{}': {}",
        query,
        prediction.prediction.top_intent.as_deref().unwrap_or("<none>")
    );

    Ok(AuthoringOutcome {
        app_id,
        version_id: app.version_id.clone(),
        entity_models,
        feature_count,
        example_count: app.examples.len(),
        training,
        published,
        prediction,
    })
}

/// Register every feature of `schema` against the matching remote node
async fn submit_features<S>(
    service: &S,
    app_id: AppId,
    version_id: &str,
    schema: &EntityNode,
    model: &RemoteEntityModel,
) -> Result<usize>
where
    S: NluService + ?Sized,
{
    let mut count = 0;
    for feature in schema.all_features() {
        let remote_id = schema
            .path_of(feature.target_node_id)
            .and_then(|path| model.find(path.as_slice()).map(|node| node.id))
            .ok_or_else(|| {
                NluServiceError::EntityNotFound(format!(
                    "{} {} in remote model '{}'",
                    schema.name(),
                    feature.target_node_id,
                    model.name
                ))
            })?;
        service
            .add_entity_feature(app_id, version_id, remote_id, feature)
            .await?;
        count += 1;
    }
    Ok(count)
}
