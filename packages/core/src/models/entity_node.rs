//! Hierarchical Entity Nodes
//!
//! An entity schema is a tree of named [`EntityNode`]s. The root is the
//! machine-learned entity itself (e.g. "Pizza order"), its children are
//! sub-entities ("Pizza", "Toppings") and so on down to the leaves
//! ("Quantity", "Size", "Type").
//!
//! Trees are produced by [`SchemaBuilder`](crate::services::SchemaBuilder)
//! from a declarative [`EntityDefinition`]. Once built, the structure is
//! fixed: names, ids and children are only readable. The one permitted
//! mutation is feature attachment through
//! [`FeatureAttacher`](crate::services::FeatureAttacher).
//!
//! ## Example Definition
//!
//! ```json
//! {
//!   "name": "Pizza order",
//!   "children": [
//!     { "name": "Pizza", "children": [{ "name": "Quantity" }, { "name": "Size" }] },
//!     { "name": "Toppings" }
//!   ]
//! }
//! ```

use crate::models::feature::FeatureRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node within one schema tree
///
/// Assigned sequentially in pre-order at build time, so the root is always `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declarative, user-authored shape of an entity schema
///
/// Input to `SchemaBuilder::build`. Carries no ids and no features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity name (must be non-blank and unique among siblings)
    pub name: String,

    /// Sub-entity definitions, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityDefinition>,
}

impl EntityDefinition {
    /// Create a leaf definition
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a definition with children
    pub fn with_children(name: impl Into<String>, children: Vec<EntityDefinition>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// A node of a built entity schema
///
/// Fields are private: the tree is read through accessors and only the
/// feature list can change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    id: NodeId,
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<EntityNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    features: Vec<FeatureRef>,
}

impl EntityNode {
    pub(crate) fn new(id: NodeId, name: String, children: Vec<EntityNode>) -> Self {
        Self {
            id,
            name,
            children,
            features: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[EntityNode] {
        &self.children
    }

    pub fn features(&self) -> &[FeatureRef] {
        &self.features
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child with the given name
    pub fn child(&self, name: &str) -> Option<&EntityNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut EntityNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn push_feature(&mut self, feature: FeatureRef) {
        self.features.push(feature);
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(EntityNode::node_count).sum::<usize>()
    }

    /// Find a node anywhere in this subtree by id
    pub fn find_by_id(&self, id: NodeId) -> Option<&EntityNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// Root-exclusive name path of the node with the given id
    ///
    /// Returns `Some(vec![])` for the root itself and `None` if no node in
    /// this subtree carries `id`. The result can be fed back to
    /// `PathResolver::resolve`.
    pub fn path_of(&self, id: NodeId) -> Option<Vec<String>> {
        if self.id == id {
            return Some(Vec::new());
        }
        self.children.iter().find_map(|child| {
            child.path_of(id).map(|mut rest| {
                rest.insert(0, child.name.clone());
                rest
            })
        })
    }

    /// All root-exclusive paths in pre-order, starting with the root's empty path
    pub fn paths(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.node_count());
        collect_paths(self, &mut Vec::new(), &mut out);
        out
    }

    /// Pre-order iterator over every node of this subtree
    pub fn iter(&self) -> impl Iterator<Item = &EntityNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Every feature attached anywhere in this subtree, in pre-order
    pub fn all_features(&self) -> impl Iterator<Item = &FeatureRef> {
        self.iter().flat_map(|n| n.features.iter())
    }

    /// Strip ids and features back to the declarative shape
    pub fn to_definition(&self) -> EntityDefinition {
        EntityDefinition {
            name: self.name.clone(),
            children: self.children.iter().map(EntityNode::to_definition).collect(),
        }
    }
}

fn collect_paths(node: &EntityNode, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    out.push(prefix.clone());
    for child in &node.children {
        prefix.push(child.name.clone());
        collect_paths(child, prefix, out);
        prefix.pop();
    }
}
