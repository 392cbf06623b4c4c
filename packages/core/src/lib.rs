//! NluForge Core
//!
//! Hierarchical entity schemas for NLU authoring: build a tree of named
//! entities, attach features to nodes addressed by path, and check that
//! labeled training examples nest consistently with the schema.
//!
//! # Modules
//!
//! - [`models`] - Data structures (EntityNode, FeatureRef, LabeledSpan, AppManifest)
//! - [`services`] - Builder, resolver, attacher, validator and manifest compiler
//!
//! # Example
//!
//! ```
//! use nluforge_core::{AppManifest, PathResolver};
//!
//! let app = AppManifest::contoso_pizza().compile().unwrap();
//! let schema = app.schema("Pizza order").unwrap();
//! let quantity = PathResolver::resolve(schema, &["Toppings", "Quantity"]).unwrap();
//! assert_eq!(quantity.features().len(), 2);
//! ```

pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
