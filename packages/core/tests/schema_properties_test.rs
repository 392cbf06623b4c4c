//! Schema Property Tests
//!
//! Build, resolve, attach and validate over randomly shaped definitions with
//! unique sibling names.

#[cfg(test)]
mod schema_properties_tests {
    use nluforge_core::{
        EntityDefinition, EntityNode, Feature, FeatureAttacher, LabelValidator, LabeledSpan,
        NodeId, PathResolver, SchemaBuilder, SchemaError,
    };
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{0,5}"
    }

    /// Trees up to four levels deep; sibling names are made unique by
    /// dropping later children that repeat an earlier name
    fn arb_definition() -> impl Strategy<Value = EntityDefinition> {
        let leaf = arb_name().prop_map(EntityDefinition::leaf);
        leaf.prop_recursive(4, 48, 4, |inner| {
            (arb_name(), prop::collection::vec(inner, 0..4)).prop_map(|(name, children)| {
                let mut seen = HashSet::new();
                let children = children
                    .into_iter()
                    .filter(|c| seen.insert(c.name.clone()))
                    .collect();
                EntityDefinition::with_children(name, children)
            })
        })
    }

    fn definition_size(def: &EntityDefinition) -> usize {
        1 + def.children.iter().map(definition_size).sum::<usize>()
    }

    /// Label every node: leaves get one character each, parents cover their
    /// children exactly
    fn label_all(node: &EntityNode, cursor: &mut usize) -> LabeledSpan {
        let start = *cursor;
        if node.is_leaf() {
            *cursor += 1;
            return LabeledSpan::new(node.name(), start, *cursor);
        }
        let children = node
            .children()
            .iter()
            .map(|child| label_all(child, cursor))
            .collect();
        LabeledSpan::new(node.name(), start, *cursor).with_children(children)
    }

    proptest! {
        #[test]
        fn build_then_every_path_resolves(def in arb_definition()) {
            let schema = SchemaBuilder::new().build(&def).unwrap();
            prop_assert_eq!(schema.node_count(), definition_size(&def));
            prop_assert_eq!(&schema.to_definition(), &def);

            let paths = schema.paths();
            prop_assert_eq!(paths.len(), schema.node_count());
            for (index, path) in paths.iter().enumerate() {
                let node = PathResolver::resolve(&schema, path.as_slice()).unwrap();
                // Pre-order ids line up with pre-order paths
                prop_assert_eq!(node.id(), NodeId(index as u32));
                let found = schema.path_of(node.id());
                prop_assert_eq!(found.as_ref(), Some(path));
            }
        }

        #[test]
        fn duplicate_sibling_is_rejected(def in arb_definition()) {
            let root = EntityDefinition::with_children("Root", vec![def.clone(), def.clone()]);
            let err = SchemaBuilder::new().build(&root).unwrap_err();
            prop_assert_eq!(
                err,
                SchemaError::DuplicateName {
                    parent_path: Vec::new(),
                    name: def.name.clone(),
                }
            );
        }

        #[test]
        fn distinct_features_on_every_node_attach(def in arb_definition()) {
            let mut schema = SchemaBuilder::new().build(&def).unwrap();
            let paths = schema.paths();
            for (index, path) in paths.iter().enumerate() {
                let feature = FeatureAttacher::attach(
                    &mut schema,
                    path.as_slice(),
                    Feature::prebuilt(format!("recognizer{}", index)),
                )
                .unwrap();
                prop_assert_eq!(feature.target_node_id, NodeId(index as u32));
            }
            prop_assert_eq!(schema.all_features().count(), paths.len());

            // Re-attaching any one of them is a duplicate
            let last = paths.len() - 1;
            let again = FeatureAttacher::attach(
                &mut schema,
                paths[last].as_slice(),
                Feature::prebuilt(format!("recognizer{}", last)),
            );
            let is_duplicate = matches!(again, Err(SchemaError::DuplicateFeature { .. }));
            prop_assert!(is_duplicate);
        }

        #[test]
        fn full_labeling_validates_idempotently(def in arb_definition()) {
            let schema = SchemaBuilder::new().build(&def).unwrap();
            let mut cursor = 0;
            let labels = label_all(&schema, &mut cursor);
            let text = "x".repeat(cursor);

            let first = LabelValidator::validate(&schema, &text, &labels);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, LabelValidator::validate(&schema, &text, &labels));
        }
    }
}
