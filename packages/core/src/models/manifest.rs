//! Application Manifest
//!
//! User-authored description of an NLU application: intents, prebuilt
//! recognizers, phrase lists, hierarchical entities, feature assignments and
//! labeled examples. Loaded from JSON and turned into validated, ready to
//! submit artifacts by `ManifestCompiler`.
//!
//! ## Example Manifest
//!
//! ```json
//! {
//!   "name": "Contoso Pizza Company",
//!   "versionId": "0.1",
//!   "intents": ["OrderPizzaIntent"],
//!   "prebuiltEntities": ["number"],
//!   "phraseLists": [{ "name": "QuantityPhraselist", "phrases": ["few", "more", "extra"] }],
//!   "entities": [{ "name": "Pizza order", "children": [{ "name": "Pizza" }] }],
//!   "features": [
//!     { "entity": "Pizza order", "path": ["Pizza"], "kind": "modelFeature", "source": "number", "required": true }
//!   ],
//!   "examples": []
//! }
//! ```

use crate::models::entity_node::EntityDefinition;
use crate::models::feature::{Feature, FeatureKind};
use crate::models::labeled_span::LabeledSpan;
use crate::services::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A phrase list feature definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseListDefinition {
    pub name: String,

    pub phrases: Vec<String>,

    /// Phrases are interchangeable synonyms rather than an open vocabulary
    #[serde(default = "default_true")]
    pub exchangeable: bool,

    #[serde(default)]
    pub enabled_for_all_models: bool,
}

/// Attach a feature to the node at `path` under the entity named `entity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAssignment {
    pub entity: String,

    /// Root-exclusive path; empty targets the entity root
    #[serde(default)]
    pub path: Vec<String>,

    pub kind: FeatureKind,

    pub source: String,

    #[serde(default)]
    pub required: bool,
}

impl FeatureAssignment {
    pub fn to_feature(&self) -> Feature {
        Feature {
            kind: self.kind,
            source: self.source.clone(),
            required: self.required,
        }
    }
}

/// An utterance with its intent and entity labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleDefinition {
    pub text: String,
    pub intent: String,
    #[serde(default)]
    pub labels: Vec<LabeledSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub name: String,

    pub version_id: String,

    /// Overrides the configured culture when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub intents: Vec<String>,

    #[serde(default)]
    pub prebuilt_entities: Vec<String>,

    #[serde(default)]
    pub phrase_lists: Vec<PhraseListDefinition>,

    #[serde(default)]
    pub entities: Vec<EntityDefinition>,

    #[serde(default)]
    pub features: Vec<FeatureAssignment>,

    #[serde(default)]
    pub examples: Vec<ExampleDefinition>,
}

fn default_true() -> bool {
    true
}

impl AppManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::parse(e.to_string()))
    }

    /// Read and parse a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded manifest from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self).map_err(|e| ManifestError::parse(e.to_string()))
    }

    /// The Contoso Pizza Company sample application
    pub fn contoso_pizza() -> Self {
        let pizza_order = EntityDefinition::with_children(
            "Pizza order",
            vec![
                EntityDefinition::with_children(
                    "Pizza",
                    vec![
                        EntityDefinition::leaf("Quantity"),
                        EntityDefinition::leaf("Type"),
                        EntityDefinition::leaf("Size"),
                    ],
                ),
                EntityDefinition::with_children(
                    "Toppings",
                    vec![
                        EntityDefinition::leaf("Type"),
                        EntityDefinition::leaf("Quantity"),
                    ],
                ),
            ],
        );

        let labels = LabeledSpan::new("Pizza order", 7, 48).with_children(vec![
            LabeledSpan::new("Pizza", 7, 30).with_children(vec![
                LabeledSpan::new("Quantity", 7, 9),
                LabeledSpan::new("Size", 11, 15),
                LabeledSpan::new("Type", 17, 23),
            ]),
            LabeledSpan::new("Toppings", 37, 48).with_children(vec![
                LabeledSpan::new("Quantity", 37, 41),
                LabeledSpan::new("Type", 43, 48),
            ]),
        ]);

        fn assignment(
            path: &[&str],
            kind: FeatureKind,
            source: &str,
            required: bool,
        ) -> FeatureAssignment {
            FeatureAssignment {
                entity: "Pizza order".to_string(),
                path: path.iter().map(|s| s.to_string()).collect(),
                kind,
                source: source.to_string(),
                required,
            }
        }

        Self {
            name: "Contoso Pizza Company".to_string(),
            version_id: "0.1".to_string(),
            culture: Some("en-us".to_string()),
            description: None,
            intents: vec!["OrderPizzaIntent".to_string()],
            prebuilt_entities: vec!["number".to_string()],
            phrase_lists: vec![PhraseListDefinition {
                name: "QuantityPhraselist".to_string(),
                phrases: vec!["few".to_string(), "more".to_string(), "extra".to_string()],
                exchangeable: true,
                enabled_for_all_models: false,
            }],
            entities: vec![pizza_order],
            features: vec![
                assignment(
                    &["Pizza", "Quantity"],
                    FeatureKind::ModelFeature,
                    "number",
                    true,
                ),
                assignment(
                    &["Toppings", "Quantity"],
                    FeatureKind::ModelFeature,
                    "number",
                    false,
                ),
                assignment(
                    &["Toppings", "Quantity"],
                    FeatureKind::PhraseList,
                    "QuantityPhraselist",
                    false,
                ),
            ],
            examples: vec![ExampleDefinition {
                text: "I want two small seafood pizzas with extra cheese.".to_string(),
                intent: "OrderPizzaIntent".to_string(),
                labels: vec![labels],
            }],
        }
    }
}
