//! Label Validator
//!
//! Checks that a tree of [`LabeledSpan`]s is well-formed training data for an
//! entity schema. The span tree and the schema tree are walked in lock-step;
//! for every span:
//!
//! 1. The root label must name the schema root (`SchemaMismatch`)
//! 2. `start <= end <= text length` in characters (`SpanOutOfBounds`)
//! 3. Child labels must name distinct children of the matching schema node
//!    (`UnknownEntity`); a schema child is labeled at most once per parent span
//! 4. Sibling spans must be pairwise disjoint (`OverlappingSpan`)
//! 5. Child spans must lie inside their parent span (`SpanNesting`)
//!
//! Offsets are half-open, so `[7,9)` and `[9,12)` touch without overlapping.
//! Validation only reads its inputs and is therefore idempotent.

use crate::models::{EntityNode, LabeledSpan, NodeId};
use crate::services::error::LabelValidationError;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, Copy)]
pub struct LabelValidator;

impl LabelValidator {
    /// Validate `span` (labeling `text`) against the schema rooted at `schema`
    ///
    /// Returns the first violation found; checks run breadth-first per level
    /// in the order listed in the module docs.
    pub fn validate(
        schema: &EntityNode,
        text: &str,
        span: &LabeledSpan,
    ) -> Result<(), LabelValidationError> {
        if span.entity_name != schema.name() {
            return Err(LabelValidationError::schema_mismatch(
                schema.name(),
                span.entity_name.clone(),
            ));
        }

        let text_len = text.chars().count();
        check_bounds(span, text_len)?;

        let mut path = Vec::new();
        validate_children(schema, span, text_len, &mut path)
    }

    /// Validate every root label of an example against `schemas`
    ///
    /// Each root label is matched to the schema with the same name; a label
    /// naming no schema is a `SchemaMismatch` against the first schema (or an
    /// empty name if there are none). Root labels must not overlap each other.
    pub fn validate_all(
        schemas: &[EntityNode],
        text: &str,
        labels: &[LabeledSpan],
    ) -> Result<(), LabelValidationError> {
        for label in labels {
            match schemas.iter().find(|s| s.name() == label.entity_name) {
                Some(schema) => Self::validate(schema, text, label)?,
                None => {
                    let expected = schemas.first().map(|s| s.name()).unwrap_or_default();
                    return Err(LabelValidationError::schema_mismatch(
                        expected,
                        label.entity_name.clone(),
                    ));
                }
            }
        }

        // Root labels are siblings too
        for (i, first) in labels.iter().enumerate() {
            if let Some(second) = labels[i + 1..].iter().find(|s| first.overlaps(s)) {
                return Err(LabelValidationError::overlapping_span(&[], first, second));
            }
        }

        Ok(())
    }
}

fn check_bounds(span: &LabeledSpan, text_len: usize) -> Result<(), LabelValidationError> {
    if span.start_index > span.end_index || span.end_index > text_len {
        return Err(LabelValidationError::span_out_of_bounds(span, text_len));
    }
    Ok(())
}

/// `path` is the root-exclusive path of `node`, which `span` labels
fn validate_children(
    node: &EntityNode,
    span: &LabeledSpan,
    text_len: usize,
    path: &mut Vec<String>,
) -> Result<(), LabelValidationError> {
    for child in &span.children {
        check_bounds(child, text_len)?;
    }

    let mut matched = Vec::with_capacity(span.children.len());
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(span.children.len());
    for child in &span.children {
        // A repeated label has no unmatched schema child left to bind to
        let schema_child = node
            .child(&child.entity_name)
            .filter(|c| seen.insert(c.id()))
            .ok_or_else(|| {
                LabelValidationError::unknown_entity(&path[..], child.entity_name.clone())
            })?;
        matched.push(schema_child);
    }

    for (i, first) in span.children.iter().enumerate() {
        if let Some(second) = span.children[i + 1..].iter().find(|s| first.overlaps(s)) {
            return Err(LabelValidationError::overlapping_span(path, first, second));
        }
    }

    for child in &span.children {
        if !span.contains(child) {
            return Err(LabelValidationError::span_nesting(span, child));
        }
    }

    for (child, schema_child) in span.children.iter().zip(matched) {
        path.push(schema_child.name().to_string());
        let result = validate_children(schema_child, child, text_len, path);
        path.pop();
        result?;
    }

    Ok(())
}
