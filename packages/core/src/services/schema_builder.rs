//! Schema Builder
//!
//! Turns a declarative [`EntityDefinition`] into an [`EntityNode`] tree,
//! assigning ids in pre-order and enforcing naming rules:
//!
//! - Names cannot be blank (empty or whitespace only)
//! - Sibling names must be unique
//!
//! Building is pure. The same builder can be reused and every `build` call
//! numbers its tree from `0`.

use crate::models::{EntityDefinition, EntityNode, NodeId};
use crate::services::error::SchemaError;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a schema tree from `definition`
    ///
    /// # Errors
    ///
    /// - `EmptyName`: a node name is blank
    /// - `DuplicateName`: two siblings share a name
    ///
    /// # Example
    ///
    /// ```
    /// use nluforge_core::models::EntityDefinition;
    /// use nluforge_core::services::SchemaBuilder;
    ///
    /// let def = EntityDefinition::with_children(
    ///     "Pizza order",
    ///     vec![EntityDefinition::leaf("Pizza"), EntityDefinition::leaf("Toppings")],
    /// );
    /// let root = SchemaBuilder::new().build(&def).unwrap();
    /// assert_eq!(root.node_count(), 3);
    /// assert_eq!(root.child("Toppings").unwrap().id().0, 2);
    /// ```
    pub fn build(&self, definition: &EntityDefinition) -> Result<EntityNode, SchemaError> {
        if definition.name.trim().is_empty() {
            return Err(SchemaError::empty_name(&[]));
        }

        let mut next_id = 0u32;
        let mut path = Vec::new();
        let root = build_node(definition, &mut path, &mut next_id)?;

        tracing::debug!(
            "Built entity schema '{}' with {} node(s)",
            root.name(),
            next_id
        );

        Ok(root)
    }
}

/// `path` is the root-exclusive path of `definition` itself
fn build_node(
    definition: &EntityDefinition,
    path: &mut Vec<String>,
    next_id: &mut u32,
) -> Result<EntityNode, SchemaError> {
    // Pre-order: the parent takes its id before any child
    let id = NodeId(*next_id);
    *next_id += 1;

    let mut seen: HashSet<&str> = HashSet::with_capacity(definition.children.len());
    for child in &definition.children {
        if child.name.trim().is_empty() {
            return Err(SchemaError::empty_name(path));
        }
        if !seen.insert(child.name.as_str()) {
            return Err(SchemaError::duplicate_name(path, child.name.clone()));
        }
    }

    let mut children = Vec::with_capacity(definition.children.len());
    for child in &definition.children {
        path.push(child.name.clone());
        let node = build_node(child, path, next_id);
        path.pop();
        children.push(node?);
    }

    Ok(EntityNode::new(id, definition.name.clone(), children))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_order() -> EntityDefinition {
        EntityDefinition::with_children(
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
        )
    }

    #[test]
    fn test_ids_follow_preorder() {
        let root = SchemaBuilder::new().build(&pizza_order()).unwrap();
        let names: Vec<(u32, &str)> = root.iter().map(|n| (n.id().0, n.name())).collect();
        assert_eq!(
            names,
            vec![
                (0, "Pizza order"),
                (1, "Pizza"),
                (2, "Quantity"),
                (3, "Type"),
                (4, "Size"),
                (5, "Toppings"),
                (6, "Type"),
                (7, "Quantity"),
            ]
        );
    }

    #[test]
    fn test_same_name_allowed_under_different_parents() {
        let root = SchemaBuilder::new().build(&pizza_order()).unwrap();
        let pizza_qty = root.child("Pizza").unwrap().child("Quantity").unwrap();
        let topping_qty = root.child("Toppings").unwrap().child("Quantity").unwrap();
        assert_ne!(pizza_qty.id(), topping_qty.id());
    }

    #[test]
    fn test_rebuild_restarts_ids() {
        let builder = SchemaBuilder::new();
        let first = builder.build(&pizza_order()).unwrap();
        let second = builder.build(&pizza_order()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_sibling_rejected() {
        let def = EntityDefinition::with_children(
            "Pizza order",
            vec![EntityDefinition::with_children(
                "Pizza",
                vec![
                    EntityDefinition::leaf("Size"),
                    EntityDefinition::leaf("Size"),
                ],
            )],
        );
        let err = SchemaBuilder::new().build(&def).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                parent_path: vec!["Pizza".to_string()],
                name: "Size".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_names_rejected() {
        let err = SchemaBuilder::new()
            .build(&EntityDefinition::leaf("  "))
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyName { parent_path: vec![] });

        let def = EntityDefinition::with_children(
            "Pizza order",
            vec![EntityDefinition::with_children(
                "Toppings",
                vec![EntityDefinition::leaf("")],
            )],
        );
        let err = SchemaBuilder::new().build(&def).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName { ref parent_path } if parent_path == &["Toppings".to_string()]));
    }
}
