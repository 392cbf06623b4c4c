//! Feature Attacher
//!
//! Second build phase: enriches an already built schema with features. The
//! target is addressed by path and the feature is bound to the target's id.
//! Attaching the same (kind, source) twice to one node is rejected so a
//! recognizer is never registered twice.

use crate::models::{EntityNode, Feature, FeatureRef};
use crate::services::error::SchemaError;
use crate::services::path_resolver::PathResolver;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureAttacher;

impl FeatureAttacher {
    /// Attach `feature` to the node at `path`
    ///
    /// Returns the bound [`FeatureRef`] as stored on the node.
    ///
    /// # Errors
    ///
    /// - `PathNotFound`: propagated from path resolution
    /// - `DuplicateFeature`: the node already carries this (kind, source)
    pub fn attach<S: AsRef<str>>(
        root: &mut EntityNode,
        path: &[S],
        feature: Feature,
    ) -> Result<FeatureRef, SchemaError> {
        let target = PathResolver::resolve_mut(root, path)?;

        if target
            .features()
            .iter()
            .any(|f| f.same_feature(feature.kind, &feature.source))
        {
            let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
            return Err(SchemaError::duplicate_feature(
                &path,
                feature.kind,
                feature.source,
            ));
        }

        let bound = FeatureRef::bind(feature, target.id());
        target.push_feature(bound.clone());

        tracing::debug!(
            "Attached {} '{}' to '{}' ({})",
            bound.kind,
            bound.source,
            target.name(),
            bound.target_node_id
        );

        Ok(bound)
    }
}
