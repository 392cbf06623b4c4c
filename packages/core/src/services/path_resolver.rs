//! Path Resolver
//!
//! Locates a schema node by its root-exclusive name path: `["Pizza", "Quantity"]`
//! is the root's child "Pizza", then its child "Quantity". The empty path is
//! the root. Sibling names are unique, so resolution never has to choose.

use crate::models::EntityNode;
use crate::services::error::SchemaError;

#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl PathResolver {
    /// Resolve `path` below `root`
    ///
    /// # Errors
    ///
    /// `PathNotFound` with the deepest resolved prefix and the first missing
    /// segment.
    ///
    /// # Example
    ///
    /// ```
    /// use nluforge_core::models::EntityDefinition;
    /// use nluforge_core::services::{PathResolver, SchemaBuilder};
    ///
    /// let def = EntityDefinition::with_children(
    ///     "Pizza order",
    ///     vec![EntityDefinition::with_children("Pizza", vec![EntityDefinition::leaf("Size")])],
    /// );
    /// let root = SchemaBuilder::new().build(&def).unwrap();
    /// let size = PathResolver::resolve(&root, &["Pizza", "Size"]).unwrap();
    /// assert_eq!(size.name(), "Size");
    /// ```
    pub fn resolve<'a, S: AsRef<str>>(
        root: &'a EntityNode,
        path: &[S],
    ) -> Result<&'a EntityNode, SchemaError> {
        let mut current = root;
        for (depth, segment) in path.iter().enumerate() {
            let segment = segment.as_ref();
            current = current
                .child(segment)
                .ok_or_else(|| not_found(path, depth))?;
        }
        Ok(current)
    }

    /// Mutable variant of [`resolve`](Self::resolve), used for feature attachment
    pub fn resolve_mut<'a, S: AsRef<str>>(
        root: &'a mut EntityNode,
        path: &[S],
    ) -> Result<&'a mut EntityNode, SchemaError> {
        let mut current = root;
        for (depth, segment) in path.iter().enumerate() {
            let segment = segment.as_ref();
            current = current
                .child_mut(segment)
                .ok_or_else(|| not_found(path, depth))?;
        }
        Ok(current)
    }

    /// Parse a dotted path ("Pizza.Quantity") into segments
    ///
    /// Empty input yields the root path. Names that contain a dot cannot be
    /// addressed this way; pass the segments directly instead.
    pub fn parse_dotted(path: &str) -> Vec<String> {
        if path.is_empty() {
            return Vec::new();
        }
        path.split('.').map(str::to_string).collect()
    }
}

fn not_found<S: AsRef<str>>(path: &[S], depth: usize) -> SchemaError {
    let resolved: Vec<String> = path[..depth]
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    SchemaError::path_not_found(&resolved, path[depth].as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityDefinition;
    use crate::services::SchemaBuilder;

    fn pizza_order() -> EntityNode {
        let def = EntityDefinition::with_children(
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
        SchemaBuilder::new().build(&def).unwrap()
    }

    #[test]
    fn test_empty_path_is_root() {
        let root = pizza_order();
        let empty: [&str; 0] = [];
        assert_eq!(PathResolver::resolve(&root, &empty).unwrap().id(), root.id());
    }

    #[test]
    fn test_same_leaf_name_resolves_per_parent() {
        let root = pizza_order();
        let toppings_qty = PathResolver::resolve(&root, &["Toppings", "Quantity"]).unwrap();
        let pizza_qty = PathResolver::resolve(&root, &["Pizza", "Quantity"]).unwrap();
        assert_eq!(toppings_qty.name(), "Quantity");
        assert_eq!(pizza_qty.name(), "Quantity");
        assert_ne!(toppings_qty.id(), pizza_qty.id());
    }

    #[test]
    fn test_every_path_resolves() {
        let root = pizza_order();
        for path in root.paths() {
            let node = PathResolver::resolve(&root, path.as_slice()).unwrap();
            assert_eq!(root.path_of(node.id()).unwrap(), path);
        }
    }

    #[test]
    fn test_missing_segment_reports_deepest_prefix() {
        let root = pizza_order();
        let err = PathResolver::resolve(&root, &["Pizza", "Crust", "Thickness"]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::PathNotFound {
                resolved: vec!["Pizza".to_string()],
                missing: "Crust".to_string(),
            }
        );

        let err = PathResolver::resolve(&root, &["Drinks"]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::PathNotFound {
                resolved: vec![],
                missing: "Drinks".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            PathResolver::parse_dotted("Pizza.Quantity"),
            vec!["Pizza".to_string(), "Quantity".to_string()]
        );
        assert!(PathResolver::parse_dotted("").is_empty());
    }
}
