//! Service Data Types
//!
//! Plain request/response records exchanged with an NLU service. Remote
//! artifacts are identified by UUIDs issued by the service.

use crate::error::{NluServiceError, Result};
use chrono::{DateTime, Utc};
use nluforge_core::{EntityNode, FeatureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub type AppId = Uuid;
pub type RemoteId = Uuid;

/// Request to create a new application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoRequest {
    pub name: String,
    pub culture: String,
    pub initial_version_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The service's view of an entity schema: same shape, remote ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntityModel {
    pub id: RemoteId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RemoteEntityModel>,
}

impl RemoteEntityModel {
    /// Mirror `schema`, issuing a fresh id for every node
    pub fn mirror(schema: &EntityNode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: schema.name().to_string(),
            children: schema.children().iter().map(Self::mirror).collect(),
        }
    }

    /// Follow a root-exclusive name path
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&RemoteEntityModel> {
        let mut current = self;
        for segment in path {
            current = current
                .children
                .iter()
                .find(|c| c.name == segment.as_ref())?;
        }
        Some(current)
    }

    /// Find a node anywhere in this model by id
    pub fn find_by_id(&self, id: RemoteId) -> Option<&RemoteEntityModel> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStatus {
    Queued,
    InProgress,
    UpToDate,
    Success,
    Fail,
}

impl TrainingStatus {
    pub fn is_done(self) -> bool {
        matches!(self, TrainingStatus::Success | TrainingStatus::UpToDate)
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Training progress of one model (intent, entity or prebuilt)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTrainingStatus {
    pub model_id: RemoteId,
    pub model_name: String,
    pub status: TrainingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub example_count: usize,
    pub checked_at: DateTime<Utc>,
}

/// A feature as registered with the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredFeature {
    pub entity_id: RemoteId,
    pub kind: FeatureKind,
    pub source: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSlot {
    pub app_id: AppId,
    pub version_id: String,
    pub slot_name: String,
    pub is_staging: bool,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentScore {
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub top_intent: Option<String>,
    pub intents: BTreeMap<String, IntentScore>,
    pub entities: serde_json::Map<String, serde_json::Value>,
}

/// Result of querying a published slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub query: String,
    pub prediction: Prediction,
}

impl PredictionResponse {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NluServiceError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nluforge_core::{EntityDefinition, SchemaBuilder};

    #[test]
    fn test_mirror_keeps_shape_and_issues_unique_ids() {
        let def = EntityDefinition::with_children(
            "Pizza order",
            vec![
                EntityDefinition::with_children("Pizza", vec![EntityDefinition::leaf("Quantity")]),
                EntityDefinition::with_children(
                    "Toppings",
                    vec![EntityDefinition::leaf("Quantity")],
                ),
            ],
        );
        let schema = SchemaBuilder::new().build(&def).unwrap();
        let model = RemoteEntityModel::mirror(&schema);

        let pizza_qty = model.find(&["Pizza", "Quantity"]).unwrap();
        let topping_qty = model.find(&["Toppings", "Quantity"]).unwrap();
        assert_ne!(pizza_qty.id, topping_qty.id);
        assert_eq!(model.find_by_id(topping_qty.id), Some(topping_qty));
        assert!(model.find(&["Pizza", "Size"]).is_none());
    }

    #[test]
    fn test_prediction_json_uses_camel_case() {
        let mut intents = BTreeMap::new();
        intents.insert("OrderPizzaIntent".to_string(), IntentScore { score: 1.0 });
        let response = PredictionResponse {
            query: "two pizzas".to_string(),
            prediction: Prediction {
                top_intent: Some("OrderPizzaIntent".to_string()),
                intents,
                entities: serde_json::Map::new(),
            },
        };

        let json = response.to_json_pretty().unwrap();
        assert!(json.contains("\"topIntent\": \"OrderPizzaIntent\""));
        let parsed: PredictionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_training_status_done() {
        assert!(TrainingStatus::Success.is_done());
        assert!(TrainingStatus::UpToDate.is_done());
        assert!(!TrainingStatus::InProgress.is_done());
        assert!(!TrainingStatus::Fail.is_done());
    }
}
