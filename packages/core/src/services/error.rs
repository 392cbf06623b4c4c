//! Service Layer Error Types
//!
//! Three layers, each a rejected-input signal carrying enough context
//! (offending name, path or span) to fix the input:
//!
//! - [`SchemaError`] - building, resolving and enriching entity schemas
//! - [`LabelValidationError`] - checking labeled spans against a schema
//! - [`ManifestError`] - loading and compiling application manifests

use crate::models::feature::FeatureKind;
use crate::models::labeled_span::LabeledSpan;
use thiserror::Error;

/// Render a root-exclusive path for messages ("Pizza.Quantity", "<root>")
pub fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

/// Schema construction, resolution and feature attachment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A node name is blank (empty or whitespace only)
    #[error("Entity name under '{}' cannot be blank", display_path(.parent_path))]
    EmptyName { parent_path: Vec<String> },

    /// Two siblings share a name
    #[error("Duplicate entity name '{name}' under '{}'", display_path(.parent_path))]
    DuplicateName {
        parent_path: Vec<String>,
        name: String,
    },

    /// A path segment has no matching child
    ///
    /// `resolved` is the deepest prefix that did resolve, `missing` the
    /// segment that failed below it.
    #[error("No entity '{missing}' under '{}'", display_path(.resolved))]
    PathNotFound {
        resolved: Vec<String>,
        missing: String,
    },

    /// The same (kind, source) feature is already attached to the target
    #[error("{kind} '{source_name}' is already attached to '{}'", display_path(.path))]
    DuplicateFeature {
        path: Vec<String>,
        kind: FeatureKind,
        source_name: String,
    },
}

impl SchemaError {
    pub fn empty_name(parent_path: &[String]) -> Self {
        Self::EmptyName {
            parent_path: parent_path.to_vec(),
        }
    }

    pub fn duplicate_name(parent_path: &[String], name: impl Into<String>) -> Self {
        Self::DuplicateName {
            parent_path: parent_path.to_vec(),
            name: name.into(),
        }
    }

    pub fn path_not_found(resolved: &[String], missing: impl Into<String>) -> Self {
        Self::PathNotFound {
            resolved: resolved.to_vec(),
            missing: missing.into(),
        }
    }

    pub fn duplicate_feature(
        path: &[String],
        kind: FeatureKind,
        source_name: impl Into<String>,
    ) -> Self {
        Self::DuplicateFeature {
            path: path.to_vec(),
            kind,
            source_name: source_name.into(),
        }
    }
}

/// Labeled span validation errors
///
/// Spans are reported by their `Display` form, e.g. `'Size'[8,12)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelValidationError {
    /// The root label does not name the schema root
    #[error("Root label '{found}' does not match schema '{expected}'")]
    SchemaMismatch { expected: String, found: String },

    /// A span falls outside `0..=text_len` or is inverted
    #[error("Span {span} is out of bounds for text of length {text_len}")]
    SpanOutOfBounds { span: String, text_len: usize },

    /// A child label names no child of the matching schema node, or one
    /// already labeled by an earlier sibling
    #[error("Unknown entity '{entity}' under '{}'", display_path(.parent_path))]
    UnknownEntity {
        parent_path: Vec<String>,
        entity: String,
    },

    /// Two sibling spans share characters
    #[error("Spans {first} and {second} overlap under '{}'", display_path(.parent_path))]
    OverlappingSpan {
        parent_path: Vec<String>,
        first: String,
        second: String,
    },

    /// A child span reaches outside its parent span
    #[error("Span {child} is not contained in parent span {parent}")]
    SpanNesting { parent: String, child: String },
}

impl LabelValidationError {
    pub fn schema_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn span_out_of_bounds(span: &LabeledSpan, text_len: usize) -> Self {
        Self::SpanOutOfBounds {
            span: span.to_string(),
            text_len,
        }
    }

    pub fn unknown_entity(parent_path: &[String], entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            parent_path: parent_path.to_vec(),
            entity: entity.into(),
        }
    }

    pub fn overlapping_span(
        parent_path: &[String],
        first: &LabeledSpan,
        second: &LabeledSpan,
    ) -> Self {
        Self::OverlappingSpan {
            parent_path: parent_path.to_vec(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn span_nesting(parent: &LabeledSpan, child: &LabeledSpan) -> Self {
        Self::SpanNesting {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }
}

/// Manifest loading and compilation errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    Parse(String),

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Schema error in entity '{entity}': {source}")]
    Schema {
        entity: String,
        #[source]
        source: SchemaError,
    },

    /// An example references an intent the manifest does not declare
    #[error("Example '{text}' uses undeclared intent '{intent}'")]
    UnknownIntent { text: String, intent: String },

    /// A feature references a recognizer or phrase list that is not declared
    #[error("{kind} source '{source_name}' is not declared in the manifest")]
    UnknownFeatureSource {
        kind: FeatureKind,
        source_name: String,
    },

    /// A feature or label names an entity root that does not exist
    #[error("No entity schema named '{0}'")]
    UnknownEntitySchema(String),

    /// A labeled example failed structural validation
    #[error("Example '{text}' is not valid training data: {source}")]
    InvalidExample {
        text: String,
        #[source]
        source: LabelValidationError,
    },
}

impl ManifestError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn schema(entity: impl Into<String>, source: SchemaError) -> Self {
        Self::Schema {
            entity: entity.into(),
            source,
        }
    }

    pub fn invalid_example(text: impl Into<String>, source: LabelValidationError) -> Self {
        Self::InvalidExample {
            text: text.into(),
            source,
        }
    }
}
