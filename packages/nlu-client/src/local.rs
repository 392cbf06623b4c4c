//! In-Process NLU Service
//!
//! [`LocalNluService`] implements [`NluService`] without a network or a model.
//! It keeps every authored artifact in memory, enforces the same structural
//! rules a hosted service would (unique names, known feature sources and
//! targets, well-formed labeled examples) and simulates asynchronous training:
//! each model reports `Queued`, then `InProgress` for a configurable number of
//! status checks, then `Success`.
//!
//! Prediction is a stand-in, not a classifier. Every intent is scored by its
//! share of the version's labeled examples and no entities are extracted.

use crate::error::{NluServiceError, Result};
use crate::service::NluService;
use crate::types::{
    AppId, AppInfoRequest, IntentScore, ModelTrainingStatus, Prediction, PredictionResponse,
    PublishedSlot, RegisteredFeature, RemoteEntityModel, RemoteId, TrainingStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nluforge_core::{
    EntityNode, FeatureKind, FeatureRef, LabelValidator, LabeledExample, LabeledSpan,
    PhraseListDefinition,
};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

const DEFAULT_IN_PROGRESS_POLLS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrainingState {
    NotStarted,
    /// Number of status checks answered since training started
    Running { checks: u32 },
    Trained,
}

#[derive(Debug)]
struct VersionState {
    intents: Vec<(RemoteId, String)>,
    prebuilts: Vec<(RemoteId, String)>,
    schemas: Vec<EntityNode>,
    entity_models: Vec<RemoteEntityModel>,
    phrase_lists: Vec<(RemoteId, PhraseListDefinition)>,
    features: Vec<RegisteredFeature>,
    examples: Vec<(RemoteId, LabeledExample)>,
    training: TrainingState,
}

impl VersionState {
    fn new() -> Self {
        Self {
            intents: Vec::new(),
            prebuilts: Vec::new(),
            schemas: Vec::new(),
            entity_models: Vec::new(),
            phrase_lists: Vec::new(),
            features: Vec::new(),
            examples: Vec::new(),
            training: TrainingState::NotStarted,
        }
    }

    fn name_taken(&self, name: &str) -> bool {
        self.intents.iter().any(|(_, n)| n == name)
            || self.prebuilts.iter().any(|(_, n)| n == name)
            || self.entity_models.iter().any(|m| m.name == name)
            || self.phrase_lists.iter().any(|(_, p)| p.name == name)
    }

    /// Any authoring change invalidates a previous training run
    fn touch(&mut self) {
        self.training = TrainingState::NotStarted;
    }

    fn feature_source_exists(&self, kind: FeatureKind, source: &str) -> bool {
        match kind {
            FeatureKind::PhraseList => self.phrase_lists.iter().any(|(_, p)| p.name == source),
            FeatureKind::PrebuiltModel => self.prebuilts.iter().any(|(_, n)| n == source),
            FeatureKind::ModelFeature => {
                self.prebuilts.iter().any(|(_, n)| n == source)
                    || self.entity_models.iter().any(|m| m.name == source)
            }
        }
    }

    fn example_count(&self, intent: &str) -> usize {
        self.examples
            .iter()
            .filter(|(_, e)| e.intent_name == intent)
            .count()
    }
}

#[derive(Debug)]
struct AppState {
    info: AppInfoRequest,
    created_at: DateTime<Utc>,
    versions: HashMap<String, VersionState>,
    /// slot name -> published version
    slots: HashMap<String, String>,
}

/// Read-only view of an authored version, for inspection and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSummary {
    pub app_name: String,
    pub created_at: DateTime<Utc>,
    pub intents: Vec<String>,
    pub prebuilts: Vec<String>,
    pub entities: Vec<RemoteEntityModel>,
    pub phrase_lists: Vec<String>,
    pub features: Vec<RegisteredFeature>,
    pub example_count: usize,
    pub trained: bool,
}

pub struct LocalNluService {
    apps: Mutex<HashMap<AppId, AppState>>,
    in_progress_polls: u32,
    failing_model: Option<String>,
}

impl Default for LocalNluService {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalNluService {
    pub fn new() -> Self {
        Self {
            apps: Mutex::new(HashMap::new()),
            in_progress_polls: DEFAULT_IN_PROGRESS_POLLS,
            failing_model: None,
        }
    }

    /// Number of status checks that report `InProgress` before `Success`
    pub fn with_in_progress_polls(mut self, polls: u32) -> Self {
        self.in_progress_polls = polls;
        self
    }

    /// Make training of the named model fail once it leaves the queue
    pub fn with_failing_model(mut self, model_name: impl Into<String>) -> Self {
        self.failing_model = Some(model_name.into());
        self
    }

    pub async fn version_summary(&self, app_id: AppId, version_id: &str) -> Result<VersionSummary> {
        let apps = self.apps.lock().await;
        let app = apps.get(&app_id).ok_or(NluServiceError::AppNotFound(app_id))?;
        let version = app
            .versions
            .get(version_id)
            .ok_or_else(|| NluServiceError::version_not_found(app_id, version_id))?;

        Ok(VersionSummary {
            app_name: app.info.name.clone(),
            created_at: app.created_at,
            intents: version.intents.iter().map(|(_, n)| n.clone()).collect(),
            prebuilts: version.prebuilts.iter().map(|(_, n)| n.clone()).collect(),
            entities: version.entity_models.clone(),
            phrase_lists: version
                .phrase_lists
                .iter()
                .map(|(_, p)| p.name.clone())
                .collect(),
            features: version.features.clone(),
            example_count: version.examples.len(),
            trained: version.training == TrainingState::Trained,
        })
    }

    /// Run `f` against one version of one application
    async fn with_version<T>(
        &self,
        app_id: AppId,
        version_id: &str,
        f: impl FnOnce(&mut VersionState) -> Result<T>,
    ) -> Result<T> {
        let mut apps = self.apps.lock().await;
        let app = apps
            .get_mut(&app_id)
            .ok_or(NluServiceError::AppNotFound(app_id))?;
        let version = app
            .versions
            .get_mut(version_id)
            .ok_or_else(|| NluServiceError::version_not_found(app_id, version_id))?;
        f(version)
    }

    fn model_status(
        &self,
        model_id: RemoteId,
        model_name: &str,
        status: TrainingStatus,
        example_count: usize,
        now: DateTime<Utc>,
    ) -> ModelTrainingStatus {
        let failing = status != TrainingStatus::Queued
            && self.failing_model.as_deref() == Some(model_name);
        ModelTrainingStatus {
            model_id,
            model_name: model_name.to_string(),
            status: if failing { TrainingStatus::Fail } else { status },
            failure_reason: failing.then(|| "simulated training failure".to_string()),
            example_count,
            checked_at: now,
        }
    }
}

fn label_depth(span: &LabeledSpan) -> usize {
    1 + span.children.iter().map(label_depth).max().unwrap_or(0)
}

#[async_trait]
impl NluService for LocalNluService {
    async fn create_app(&self, request: &AppInfoRequest) -> Result<AppId> {
        if request.name.trim().is_empty() {
            return Err(NluServiceError::invalid_request("application name is required"));
        }
        if request.initial_version_id.trim().is_empty() {
            return Err(NluServiceError::invalid_request("initial version id is required"));
        }

        let mut apps = self.apps.lock().await;
        if apps.values().any(|a| a.info.name == request.name) {
            return Err(NluServiceError::conflict(format!(
                "application '{}' already exists",
                request.name
            )));
        }

        let app_id = Uuid::new_v4();
        let mut versions = HashMap::new();
        versions.insert(request.initial_version_id.clone(), VersionState::new());
        apps.insert(
            app_id,
            AppState {
                info: request.clone(),
                created_at: Utc::now(),
                versions,
                slots: HashMap::new(),
            },
        );

        tracing::debug!("Created application '{}' ({})", request.name, app_id);
        Ok(app_id)
    }

    async fn add_intent(&self, app_id: AppId, version_id: &str, name: &str) -> Result<RemoteId> {
        self.with_version(app_id, version_id, |version| {
            if version.name_taken(name) {
                return Err(NluServiceError::conflict(format!("model '{}' already exists", name)));
            }
            let id = Uuid::new_v4();
            version.intents.push((id, name.to_string()));
            version.touch();
            Ok(id)
        })
        .await
    }

    async fn add_prebuilts(
        &self,
        app_id: AppId,
        version_id: &str,
        names: &[String],
    ) -> Result<Vec<RemoteId>> {
        self.with_version(app_id, version_id, |version| {
            for (i, name) in names.iter().enumerate() {
                if version.name_taken(name) || names[..i].contains(name) {
                    return Err(NluServiceError::conflict(format!(
                        "prebuilt '{}' already exists",
                        name
                    )));
                }
            }
            let ids: Vec<RemoteId> = names
                .iter()
                .map(|name| {
                    let id = Uuid::new_v4();
                    version.prebuilts.push((id, name.clone()));
                    id
                })
                .collect();
            version.touch();
            Ok(ids)
        })
        .await
    }

    async fn add_entity(
        &self,
        app_id: AppId,
        version_id: &str,
        schema: &EntityNode,
    ) -> Result<RemoteEntityModel> {
        self.with_version(app_id, version_id, |version| {
            if version.name_taken(schema.name()) {
                return Err(NluServiceError::conflict(format!(
                    "model '{}' already exists",
                    schema.name()
                )));
            }
            let model = RemoteEntityModel::mirror(schema);
            version.schemas.push(schema.clone());
            version.entity_models.push(model.clone());
            version.touch();
            Ok(model)
        })
        .await
    }

    async fn add_phrase_list(
        &self,
        app_id: AppId,
        version_id: &str,
        phrase_list: &PhraseListDefinition,
    ) -> Result<RemoteId> {
        self.with_version(app_id, version_id, |version| {
            if version.name_taken(&phrase_list.name) {
                return Err(NluServiceError::conflict(format!(
                    "phrase list '{}' already exists",
                    phrase_list.name
                )));
            }
            let id = Uuid::new_v4();
            version.phrase_lists.push((id, phrase_list.clone()));
            version.touch();
            Ok(id)
        })
        .await
    }

    async fn add_entity_feature(
        &self,
        app_id: AppId,
        version_id: &str,
        entity_id: RemoteId,
        feature: &FeatureRef,
    ) -> Result<()> {
        self.with_version(app_id, version_id, |version| {
            if !version
                .entity_models
                .iter()
                .any(|m| m.find_by_id(entity_id).is_some())
            {
                return Err(NluServiceError::EntityNotFound(entity_id.to_string()));
            }
            if !version.feature_source_exists(feature.kind, &feature.source) {
                return Err(NluServiceError::FeatureSourceNotFound(feature.source.clone()));
            }
            if version
                .features
                .iter()
                .any(|f| f.entity_id == entity_id && f.kind == feature.kind && f.source == feature.source)
            {
                return Err(NluServiceError::conflict(format!(
                    "{} '{}' already attached to {}",
                    feature.kind, feature.source, entity_id
                )));
            }
            version.features.push(RegisteredFeature {
                entity_id,
                kind: feature.kind,
                source: feature.source.clone(),
                required: feature.required,
            });
            version.touch();
            Ok(())
        })
        .await
    }

    async fn add_example(
        &self,
        app_id: AppId,
        version_id: &str,
        example: &LabeledExample,
        enable_nested_children: bool,
    ) -> Result<RemoteId> {
        self.with_version(app_id, version_id, |version| {
            if !version.intents.iter().any(|(_, n)| n == &example.intent_name) {
                return Err(NluServiceError::IntentNotFound(example.intent_name.clone()));
            }
            for label in &example.entity_labels {
                if !version.schemas.iter().any(|s| s.name() == label.entity_name) {
                    return Err(NluServiceError::EntityNotFound(label.entity_name.clone()));
                }
                if !enable_nested_children && label_depth(label) > 2 {
                    return Err(NluServiceError::invalid_request(format!(
                        "label '{}' has nested children; enable nested children to submit it",
                        label.entity_name
                    )));
                }
            }
            LabelValidator::validate_all(&version.schemas, &example.text, &example.entity_labels)?;

            let id = Uuid::new_v4();
            version.examples.push((id, example.clone()));
            version.touch();
            Ok(id)
        })
        .await
    }

    async fn train_version(&self, app_id: AppId, version_id: &str) -> Result<()> {
        self.with_version(app_id, version_id, |version| {
            if version.intents.is_empty() && version.entity_models.is_empty() {
                return Err(NluServiceError::invalid_request(
                    "version has no models to train",
                ));
            }
            version.training = TrainingState::Running { checks: 0 };
            Ok(())
        })
        .await?;

        tracing::debug!("Training queued for {} v{}", app_id, version_id);
        Ok(())
    }

    async fn training_status(
        &self,
        app_id: AppId,
        version_id: &str,
    ) -> Result<Vec<ModelTrainingStatus>> {
        self.with_version(app_id, version_id, |version| {
            let status = match version.training {
                TrainingState::NotStarted => {
                    return Err(NluServiceError::not_trained(version_id));
                }
                TrainingState::Trained => TrainingStatus::Success,
                TrainingState::Running { checks } => {
                    let status = if checks == 0 {
                        TrainingStatus::Queued
                    } else if checks <= self.in_progress_polls {
                        TrainingStatus::InProgress
                    } else {
                        TrainingStatus::Success
                    };
                    version.training = if status == TrainingStatus::Success {
                        TrainingState::Trained
                    } else {
                        TrainingState::Running { checks: checks + 1 }
                    };
                    status
                }
            };

            let now = Utc::now();
            let mut statuses: Vec<ModelTrainingStatus> = version
                .intents
                .iter()
                .map(|(id, name)| {
                    self.model_status(*id, name, status, version.example_count(name), now)
                })
                .collect();
            statuses.extend(
                version
                    .entity_models
                    .iter()
                    .map(|m| self.model_status(m.id, &m.name, status, 0, now)),
            );
            statuses.extend(
                version
                    .prebuilts
                    .iter()
                    .map(|(id, name)| self.model_status(*id, name, status, 0, now)),
            );

            // A failed model leaves the version untrained
            if statuses.iter().any(|s| s.status == TrainingStatus::Fail) {
                version.training = TrainingState::NotStarted;
            }

            Ok(statuses)
        })
        .await
    }

    async fn publish(
        &self,
        app_id: AppId,
        version_id: &str,
        slot_name: &str,
        is_staging: bool,
    ) -> Result<PublishedSlot> {
        let mut apps = self.apps.lock().await;
        let app = apps
            .get_mut(&app_id)
            .ok_or(NluServiceError::AppNotFound(app_id))?;
        let version = app
            .versions
            .get(version_id)
            .ok_or_else(|| NluServiceError::version_not_found(app_id, version_id))?;
        if version.training != TrainingState::Trained {
            return Err(NluServiceError::not_trained(version_id));
        }

        app.slots
            .insert(slot_name.to_string(), version_id.to_string());

        tracing::debug!("Published {} v{} to slot '{}'", app_id, version_id, slot_name);
        Ok(PublishedSlot {
            app_id,
            version_id: version_id.to_string(),
            slot_name: slot_name.to_string(),
            is_staging,
            published_at: Utc::now(),
        })
    }

    async fn predict(
        &self,
        app_id: AppId,
        slot_name: &str,
        query: &str,
    ) -> Result<PredictionResponse> {
        let apps = self.apps.lock().await;
        let app = apps.get(&app_id).ok_or(NluServiceError::AppNotFound(app_id))?;
        let version_id = app
            .slots
            .get(slot_name)
            .ok_or_else(|| NluServiceError::NotPublished {
                slot: slot_name.to_string(),
            })?;
        let version = app
            .versions
            .get(version_id)
            .ok_or_else(|| NluServiceError::version_not_found(app_id, version_id.clone()))?;

        let total = version.examples.len();
        let intents: BTreeMap<String, IntentScore> = version
            .intents
            .iter()
            .map(|(_, name)| {
                let score = if total == 0 {
                    0.0
                } else {
                    version.example_count(name) as f64 / total as f64
                };
                (name.clone(), IntentScore { score })
            })
            .collect();

        // Highest score wins; ties go to the first declared intent
        let top_intent = version
            .intents
            .iter()
            .map(|(_, name)| name)
            .fold(None::<&String>, |best, name| match best {
                Some(b) if intents[b].score >= intents[name].score => Some(b),
                _ => Some(name),
            })
            .cloned();

        Ok(PredictionResponse {
            query: query.to_string(),
            prediction: Prediction {
                top_intent,
                intents,
                entities: serde_json::Map::new(),
            },
        })
    }
}
