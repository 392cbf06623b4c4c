//! Entity Features
//!
//! Features are auxiliary signals attached to a schema node: a prebuilt
//! recognizer ("number"), a phrase list ("QuantityPhraselist") or another
//! model used as a feature, optionally marked required.

use crate::models::entity_node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What provides the feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    /// A prebuilt recognizer shipped by the service (e.g. "number")
    PrebuiltModel,

    /// A user-defined phrase list
    PhraseList,

    /// Another model used as a feature; the only kind that honours `required`
    ModelFeature,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureKind::PrebuiltModel => "prebuilt model",
            FeatureKind::PhraseList => "phrase list",
            FeatureKind::ModelFeature => "model feature",
        };
        f.write_str(s)
    }
}

/// A feature not yet bound to a node
///
/// Passed to `FeatureAttacher::attach`, which binds it to the resolved
/// target and returns the resulting [`FeatureRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub source: String,
    pub required: bool,
}

impl Feature {
    pub fn prebuilt(source: impl Into<String>) -> Self {
        Self {
            kind: FeatureKind::PrebuiltModel,
            source: source.into(),
            required: false,
        }
    }

    pub fn phrase_list(source: impl Into<String>) -> Self {
        Self {
            kind: FeatureKind::PhraseList,
            source: source.into(),
            required: false,
        }
    }

    pub fn model(source: impl Into<String>) -> Self {
        Self {
            kind: FeatureKind::ModelFeature,
            source: source.into(),
            required: false,
        }
    }

    /// Mark the feature as required. Ignored unless `kind` is `ModelFeature`.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A feature attached to a specific schema node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRef {
    pub kind: FeatureKind,

    /// Name of the recognizer, phrase list or model providing the feature
    pub source: String,

    /// Node this feature modifies
    pub target_node_id: NodeId,

    #[serde(default)]
    pub required: bool,
}

impl FeatureRef {
    /// Bind `feature` to `target`
    ///
    /// `required` is dropped for every kind other than `ModelFeature`.
    pub fn bind(feature: Feature, target: NodeId) -> Self {
        let required = feature.required && feature.kind == FeatureKind::ModelFeature;
        Self {
            kind: feature.kind,
            source: feature.source,
            target_node_id: target,
            required,
        }
    }

    /// Two refs are the same feature when kind and source agree
    pub fn same_feature(&self, kind: FeatureKind, source: &str) -> bool {
        self.kind == kind && self.source == source
    }
}
