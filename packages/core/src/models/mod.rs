//! Data Models
//!
//! - `EntityNode` / `EntityDefinition` - hierarchical entity schemas
//! - `Feature` / `FeatureRef` - auxiliary recognizers attached to schema nodes
//! - `LabeledSpan` / `LabeledExample` - nested entity labels over an utterance
//! - `AppManifest` - user-authored application definition

pub mod entity_node;
pub mod feature;
pub mod labeled_span;
pub mod manifest;

pub use entity_node::{EntityDefinition, EntityNode, NodeId};
pub use feature::{Feature, FeatureKind, FeatureRef};
pub use labeled_span::{LabeledExample, LabeledSpan};
pub use manifest::{AppManifest, ExampleDefinition, FeatureAssignment, PhraseListDefinition};
