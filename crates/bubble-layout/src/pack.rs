#![forbid(unsafe_code)]

//! Recursive enclosing-circle packing of a weighted hierarchy.
//!
//! # Algorithm
//!
//! 1. **Leaf radii**: every leaf gets `r = sqrt(weight / max_leaf_weight)`,
//!    so area is proportional to weight and the largest leaf has `r = 1`
//!    whatever the input magnitude.
//! 2. **Bottom-up packing**: the positive-weight children of each container
//!    are packed with [`pack_siblings`] (largest first, ties in input order),
//!    giving child positions relative to the container center and the
//!    container radius.
//! 3. **Padding pass**: step 2 is repeated with each child radius grown by
//!    the padding expressed in unscaled units, which leaves a gap between
//!    siblings and between a child and its parent boundary.
//! 4. **Top-down placement**: the root is scaled to fill the canvas, and
//!    every child is scaled by the same factor and translated into its
//!    parent.
//!
//! # Invariants
//!
//! 1. The root is centered at `(side/2, side/2)` with radius `side/2`.
//! 2. Siblings never overlap; every child lies inside its parent.
//! 3. The padding gap is approximate: the padding pass grows the root a
//!    little, so after scaling the gap between siblings (and to the parent
//!    boundary) lands slightly under `padding`, e.g. about 2.7 to 2.9 for
//!    the default of 3.
//! 4. Zero-weight nodes (and everything below them) get `r = 0` at their
//!    parent's center.
//! 5. Identical hierarchies and sides produce bit-identical generations.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use bubble_core::geometry::Circle;

use crate::data::DataItem;
use crate::hierarchy::Hierarchy;
use crate::siblings::pack_siblings;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default gap between packed circles, in canvas units.
pub const DEFAULT_PADDING: f64 = 3.0;

/// Packing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackConfig {
    /// Gap between siblings and between a child and its parent boundary.
    pub padding: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

impl PackConfig {
    /// Set the padding (builder). Negative or non-finite values become 0.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        self
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// A laid-out node.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Source item, with its child list emptied.
    pub item: Arc<DataItem>,
    /// Center x in canvas coordinates.
    pub x: f64,
    /// Center y in canvas coordinates.
    pub y: f64,
    /// Radius.
    pub r: f64,
    /// Distance from the synthetic root.
    pub depth: usize,
    /// Aggregate weight.
    pub weight: f64,
    /// Parent index within the generation.
    pub parent: Option<usize>,
    /// Contiguous index range of the children within the generation.
    pub children: Range<usize>,
}

impl LayoutNode {
    /// Identity key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Geometry as a circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.r)
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the node is drawn: not the root and a positive radius.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.parent.is_some() && self.r > 0.0
    }
}

/// One complete, immutable layout produced by a packing pass.
///
/// Nodes are stored breadth-first with the synthetic root at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    nodes: Vec<LayoutNode>,
    side: f64,
    index: HashMap<String, usize>,
}

impl Generation {
    /// A generation with no nodes at all, e.g. before the first data arrives.
    #[must_use]
    pub fn empty(side: f64) -> Self {
        Self {
            nodes: Vec::new(),
            side,
            index: HashMap::new(),
        }
    }

    /// Canvas side `D` the generation was packed into.
    #[must_use]
    pub fn side(&self) -> f64 {
        self.side
    }

    /// All nodes, root first, breadth-first.
    #[must_use]
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// The synthetic root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }

    /// Node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LayoutNode> {
        self.nodes.get(index)
    }

    /// Look up a node by id. The synthetic root is not keyed.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Index of the node with the given id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Children of the node at `index`.
    #[must_use]
    pub fn children(&self, index: usize) -> &[LayoutNode] {
        match self.nodes.get(index) {
            Some(node) => &self.nodes[node.children.clone()],
            None => &[],
        }
    }

    /// Drawn nodes in generation order (root and zero-radius nodes skipped).
    pub fn visible(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|n| n.is_visible())
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the generation has no drawn nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Packing
// ---------------------------------------------------------------------------

/// Lay out `hierarchy` in a square canvas of side `side`.
#[must_use]
pub fn pack(hierarchy: &Hierarchy, side: f64, config: &PackConfig) -> Generation {
    let side = if side.is_finite() { side.max(0.0) } else { 0.0 };
    let nodes = hierarchy.nodes();
    let mut circles = vec![Circle::default(); nodes.len()];

    let degenerate = side <= 0.0 || hierarchy.total_weight() <= 0.0;
    if !degenerate {
        // Radii are taken relative to the heaviest leaf so packing tolerances
        // stay meaningful at any input magnitude; `k` below undoes the scale.
        let heaviest = nodes
            .iter()
            .filter(|n| !n.is_container())
            .map(|n| n.weight)
            .fold(0.0f64, f64::max);
        let unit = heaviest.sqrt();
        for (circle, node) in circles.iter_mut().zip(nodes) {
            if !node.is_container() {
                circle.r = node.weight.sqrt() / unit;
            }
        }

        pack_children(hierarchy, &mut circles, 0.0);
        let padding = config.padding * circles[0].r / side;
        if padding > 0.0 {
            pack_children(hierarchy, &mut circles, padding);
        }

        let k = side / (2.0 * circles[0].r);
        for i in 1..nodes.len() {
            let Some(parent) = nodes[i].parent else {
                continue;
            };
            let p = circles[parent];
            let c = circles[i];
            circles[i] = Circle::new(p.x + k * c.x, p.y + k * c.y, c.r * k);
        }
        // Children were offset from the root at the origin; shift them now
        // that the root sits at the canvas center.
        for circle in circles.iter_mut().skip(1) {
            circle.x += side / 2.0;
            circle.y += side / 2.0;
        }
    } else {
        for circle in circles.iter_mut() {
            *circle = Circle::new(side / 2.0, side / 2.0, 0.0);
        }
    }
    if let Some(root) = circles.first_mut() {
        *root = Circle::new(side / 2.0, side / 2.0, side / 2.0);
    }

    let mut index = HashMap::with_capacity(nodes.len());
    let layout: Vec<LayoutNode> = nodes
        .iter()
        .zip(&circles)
        .enumerate()
        .map(|(i, (node, circle))| {
            if i > 0 {
                index.insert(node.item.id.clone(), i);
            }
            LayoutNode {
                item: Arc::clone(&node.item),
                x: circle.x,
                y: circle.y,
                r: circle.r,
                depth: node.depth,
                weight: node.weight,
                parent: node.parent,
                children: node.children.clone(),
            }
        })
        .collect();

    tracing::trace!(nodes = layout.len(), side, "packed hierarchy");

    Generation {
        nodes: layout,
        side,
        index,
    }
}

/// Bottom-up pass: pack the children of every container, leaving child
/// positions relative to their parent's center.
fn pack_children(hierarchy: &Hierarchy, circles: &mut [Circle], padding: f64) {
    let nodes = hierarchy.nodes();
    let mut order: Vec<usize> = Vec::new();
    let mut packed: Vec<Circle> = Vec::new();

    for i in (0..nodes.len()).rev() {
        let node = &nodes[i];
        if !node.is_container() {
            continue;
        }

        for child in node.children.clone() {
            circles[child].x = 0.0;
            circles[child].y = 0.0;
            if nodes[child].weight <= 0.0 {
                circles[child].r = 0.0;
            }
        }

        order.clear();
        order.extend(node.children.clone().filter(|&c| nodes[c].weight > 0.0));
        if order.is_empty() {
            circles[i].r = 0.0;
            continue;
        }
        // Stable: equal weights keep input order.
        order.sort_by(|&a, &b| nodes[b].weight.total_cmp(&nodes[a].weight));

        packed.clear();
        packed.extend(
            order
                .iter()
                .map(|&c| Circle::new(0.0, 0.0, circles[c].r + padding)),
        );
        let enclosing = pack_siblings(&mut packed);

        for (&c, p) in order.iter().zip(&packed) {
            circles[c] = Circle::new(p.x, p.y, p.r - padding);
        }
        circles[i].r = enclosing + padding;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
