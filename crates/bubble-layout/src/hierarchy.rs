#![forbid(unsafe_code)]

//! Hierarchy normalization.
//!
//! Turns a [`Dataset`] into an index-based tree under a single synthetic
//! root and computes aggregate weights.
//!
//! # Invariants
//!
//! 1. Index 0 is the synthetic root (empty id, depth 0, no parent).
//! 2. Nodes are stored breadth-first, so the children of any node occupy a
//!    contiguous index range and always follow their parent.
//! 3. A leaf's weight is its `value`; a container's weight is the sum of its
//!    children's weights (conservation). An empty container weighs 0.
//! 4. Ids are unique across the whole tree.
//!
//! # Failure Modes
//!
//! Building fails fast with [`InvalidDataError`] on the first offending
//! item; nothing partial is returned.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::data::{DataItem, Dataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a dataset cannot be turned into a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidDataError {
    /// Two items anywhere in the tree share an id.
    DuplicateId {
        /// The repeated id.
        id: String,
    },
    /// A leaf has no `value`.
    MissingValue {
        /// Id of the offending leaf.
        id: String,
    },
    /// A leaf value is negative, infinite, or NaN.
    InvalidValue {
        /// Id of the offending leaf.
        id: String,
        /// The rejected value.
        value: f64,
    },
    /// An item has an empty id.
    EmptyId {
        /// Id of the parent item (empty for top-level items).
        parent: String,
    },
}

impl fmt::Display for InvalidDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate item id '{id}'"),
            Self::MissingValue { id } => write!(f, "leaf '{id}' has no value"),
            Self::InvalidValue { id, value } => {
                write!(f, "leaf '{id}' has invalid value {value} (expected finite, >= 0)")
            }
            Self::EmptyId { parent } if parent.is_empty() => {
                f.write_str("top-level item has an empty id")
            }
            Self::EmptyId { parent } => write!(f, "child of '{parent}' has an empty id"),
        }
    }
}

impl std::error::Error for InvalidDataError {}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// One node of the normalized tree.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Source item, with its child list emptied.
    pub item: Arc<DataItem>,
    /// Aggregate weight (sum of descendant leaf values).
    pub weight: f64,
    /// Distance from the synthetic root.
    pub depth: usize,
    /// Parent index; `None` only for the root.
    pub parent: Option<usize>,
    /// Contiguous index range of the children.
    pub children: Range<usize>,
    container: bool,
}

impl HierarchyNode {
    /// Identity key of the node.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Whether this node is a container (may still have zero children).
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.container
    }
}

/// Normalized, weighted tree rooted at a synthetic node.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Normalize `dataset` into a weighted hierarchy.
    pub fn build(dataset: &Dataset) -> Result<Self, InvalidDataError> {
        let mut nodes = vec![HierarchyNode {
            item: Arc::new(DataItem::default()),
            weight: 0.0,
            depth: 0,
            parent: None,
            children: 0..0,
            container: true,
        }];
        // Child items still to be expanded, parallel to `nodes`.
        let mut pending: Vec<&[DataItem]> = vec![dataset.top_level()];
        let mut seen: HashSet<&str> = HashSet::new();

        let mut cursor = 0;
        while cursor < nodes.len() {
            let start = nodes.len();
            let depth = nodes[cursor].depth + 1;
            let items = pending[cursor];
            for child in items {
                if child.id.is_empty() {
                    return Err(InvalidDataError::EmptyId {
                        parent: nodes[cursor].item.id.clone(),
                    });
                }
                if !seen.insert(child.id.as_str()) {
                    return Err(InvalidDataError::DuplicateId {
                        id: child.id.clone(),
                    });
                }
                let weight = match (&child.children, child.value) {
                    (Some(_), _) => 0.0,
                    (None, None) => {
                        return Err(InvalidDataError::MissingValue {
                            id: child.id.clone(),
                        });
                    }
                    (None, Some(v)) if !v.is_finite() || v < 0.0 => {
                        return Err(InvalidDataError::InvalidValue {
                            id: child.id.clone(),
                            value: v,
                        });
                    }
                    (None, Some(v)) => v,
                };
                nodes.push(HierarchyNode {
                    item: Arc::new(child.detached()),
                    weight,
                    depth,
                    parent: Some(cursor),
                    children: 0..0,
                    container: child.is_container(),
                });
                pending.push(child.children.as_deref().unwrap_or(&[]));
            }
            nodes[cursor].children = start..nodes.len();
            cursor += 1;
        }

        // Children always follow their parent, so a reverse sweep sees every
        // child total before the parent sums it.
        for i in (0..nodes.len()).rev() {
            if nodes[i].container {
                let range = nodes[i].children.clone();
                nodes[i].weight = nodes[range].iter().map(|n| n.weight).sum();
            }
        }

        Ok(Self { nodes })
    }

    /// The synthetic root.
    #[must_use]
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    /// All nodes in breadth-first order.
    #[must_use]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HierarchyNode> {
        self.nodes.get(index)
    }

    /// Children of the node at `index`.
    #[must_use]
    pub fn children(&self, index: usize) -> &[HierarchyNode] {
        match self.nodes.get(index) {
            Some(node) => &self.nodes[node.children.clone()],
            None => &[],
        }
    }

    /// Number of nodes, including the synthetic root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the synthetic root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Total weight of the dataset.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.nodes[0].weight
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn forest(items: Vec<DataItem>) -> Dataset {
        Dataset::Forest(items)
    }

    #[test]
    fn forest_members_become_root_children() {
        let h = Hierarchy::build(&forest(vec![
            DataItem::leaf("a", 10.0),
            DataItem::leaf("b", 5.0),
        ]))
        .expect("valid");
        assert_eq!(h.len(), 3);
        assert_eq!(h.root().children, 1..3);
        assert_eq!(h.total_weight(), 15.0);
        let ids: Vec<&str> = h.children(0).iter().map(HierarchyNode::id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn single_tree_is_wrapped() {
        let h = Hierarchy::build(&Dataset::Tree(DataItem::group(
            "top",
            vec![DataItem::leaf("a", 1.0), DataItem::leaf("b", 2.0)],
        )))
        .expect("valid");
        assert_eq!(h.root().children, 1..2);
        let top = &h.nodes()[1];
        assert_eq!(top.id(), "top");
        assert_eq!(top.depth, 1);
        assert_eq!(top.weight, 3.0);
        assert_eq!(h.children(1).len(), 2);
        assert!(h.children(1).iter().all(|n| n.depth == 2 && n.parent == Some(1)));
    }

    #[test]
    fn breadth_first_children_are_contiguous() {
        let h = Hierarchy::build(&forest(vec![
            DataItem::group("g1", vec![DataItem::leaf("a", 1.0), DataItem::leaf("b", 1.0)]),
            DataItem::group("g2", vec![DataItem::leaf("c", 4.0)]),
        ]))
        .expect("valid");
        for (i, node) in h.nodes().iter().enumerate() {
            for child in node.children.clone() {
                assert_eq!(h.nodes()[child].parent, Some(i));
                assert!(child > i);
            }
        }
        assert_eq!(h.nodes()[1].weight, 2.0);
        assert_eq!(h.nodes()[2].weight, 4.0);
        assert_eq!(h.total_weight(), 6.0);
    }

    #[test]
    fn empty_container_weighs_zero() {
        let h = Hierarchy::build(&forest(vec![DataItem::group("g", Vec::new())])).expect("valid");
        assert!(h.nodes()[1].is_container());
        assert_eq!(h.nodes()[1].weight, 0.0);
    }

    #[test]
    fn empty_dataset_is_just_root() {
        let h = Hierarchy::build(&Dataset::default()).expect("valid");
        assert!(h.is_empty());
        assert_eq!(h.total_weight(), 0.0);
    }

    #[test]
    fn missing_value_rejected() {
        let err = Hierarchy::build(&forest(vec![DataItem {
            id: "x".into(),
            ..DataItem::default()
        }]))
        .unwrap_err();
        assert_eq!(err, InvalidDataError::MissingValue { id: "x".into() });
    }

    #[test]
    fn duplicate_across_subtrees_rejected() {
        let err = Hierarchy::build(&forest(vec![
            DataItem::group("g1", vec![DataItem::leaf("dup", 1.0)]),
            DataItem::group("g2", vec![DataItem::leaf("dup", 2.0)]),
        ]))
        .unwrap_err();
        assert_eq!(err, InvalidDataError::DuplicateId { id: "dup".into() });
    }

    #[test]
    fn negative_and_nan_values_rejected() {
        let err = Hierarchy::build(&forest(vec![DataItem::leaf("n", -1.0)])).unwrap_err();
        assert!(matches!(err, InvalidDataError::InvalidValue { .. }));
        let err = Hierarchy::build(&forest(vec![DataItem::leaf("n", f64::NAN)])).unwrap_err();
        assert!(matches!(err, InvalidDataError::InvalidValue { .. }));
    }

    #[test]
    fn empty_id_rejected_with_parent_context() {
        let err = Hierarchy::build(&forest(vec![DataItem::group(
            "g",
            vec![DataItem::leaf("", 1.0)],
        )]))
        .unwrap_err();
        assert_eq!(err, InvalidDataError::EmptyId { parent: "g".into() });
        assert_eq!(err.to_string(), "child of 'g' has an empty id");
    }

    #[test]
    fn container_value_is_ignored() {
        let mut group = DataItem::group("g", vec![DataItem::leaf("a", 2.0)]);
        group.value = Some(100.0);
        let h = Hierarchy::build(&forest(vec![group])).expect("valid");
        assert_eq!(h.nodes()[1].weight, 2.0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            InvalidDataError::DuplicateId { id: "a".into() }.to_string(),
            "duplicate item id 'a'"
        );
        assert_eq!(
            InvalidDataError::EmptyId { parent: String::new() }.to_string(),
            "top-level item has an empty id"
        );
    }
}
