//! Schema Services
//!
//! - `SchemaBuilder` - builds entity schema trees from definitions
//! - `PathResolver` - locates schema nodes by name path
//! - `FeatureAttacher` - enriches built schemas with features
//! - `LabelValidator` - checks labeled spans against a schema
//! - `ManifestCompiler` - runs all of the above over an application manifest
//!
//! Everything here is synchronous and free of I/O apart from manifest loading.

pub mod error;
pub mod feature_attacher;
pub mod label_validator;
pub mod manifest_compiler;
pub mod path_resolver;
pub mod schema_builder;


pub use error::{LabelValidationError, ManifestError, SchemaError};
pub use feature_attacher::FeatureAttacher;
pub use label_validator::LabelValidator;
pub use manifest_compiler::{CompiledApp, ManifestCompiler};
pub use path_resolver::PathResolver;
pub use schema_builder::SchemaBuilder;
