//! NLU Service Contract
//!
//! The hosted service is a black box: training, prediction and the wire
//! protocol live behind this trait. Implementations must be shareable across
//! tasks.

use crate::error::Result;
use crate::types::{
    AppId, AppInfoRequest, ModelTrainingStatus, PredictionResponse, PublishedSlot,
    RemoteEntityModel, RemoteId,
};
use async_trait::async_trait;
use nluforge_core::{EntityNode, FeatureRef, LabeledExample, PhraseListDefinition};

#[async_trait]
pub trait NluService: Send + Sync {
    /// Create an application with its initial version
    async fn create_app(&self, request: &AppInfoRequest) -> Result<AppId>;

    async fn add_intent(&self, app_id: AppId, version_id: &str, name: &str) -> Result<RemoteId>;

    /// Register prebuilt recognizers such as "number"
    async fn add_prebuilts(
        &self,
        app_id: AppId,
        version_id: &str,
        names: &[String],
    ) -> Result<Vec<RemoteId>>;

    /// Register a hierarchical entity; the returned model carries remote ids
    /// for every node of `schema`
    async fn add_entity(
        &self,
        app_id: AppId,
        version_id: &str,
        schema: &EntityNode,
    ) -> Result<RemoteEntityModel>;

    async fn add_phrase_list(
        &self,
        app_id: AppId,
        version_id: &str,
        phrase_list: &PhraseListDefinition,
    ) -> Result<RemoteId>;

    /// Attach `feature` to the remote entity node `entity_id`
    async fn add_entity_feature(
        &self,
        app_id: AppId,
        version_id: &str,
        entity_id: RemoteId,
        feature: &FeatureRef,
    ) -> Result<()>;

    async fn add_example(
        &self,
        app_id: AppId,
        version_id: &str,
        example: &LabeledExample,
        enable_nested_children: bool,
    ) -> Result<RemoteId>;

    /// Start training; progress is observed through `training_status`
    async fn train_version(&self, app_id: AppId, version_id: &str) -> Result<()>;

    async fn training_status(
        &self,
        app_id: AppId,
        version_id: &str,
    ) -> Result<Vec<ModelTrainingStatus>>;

    async fn publish(
        &self,
        app_id: AppId,
        version_id: &str,
        slot_name: &str,
        is_staging: bool,
    ) -> Result<PublishedSlot>;

    async fn predict(
        &self,
        app_id: AppId,
        slot_name: &str,
        query: &str,
    ) -> Result<PredictionResponse>;
}
