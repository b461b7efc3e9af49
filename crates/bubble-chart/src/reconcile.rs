#![forbid(unsafe_code)]

//! Keyed three-way classification of two successive generations.
//!
//! Nodes are matched solely by `id`. Only the visual set (non-root nodes with
//! a positive radius) takes part.
//!
//! # Invariants
//!
//! 1. Every visual id of `next` is either entering or updating, never both.
//! 2. Every visual id of `previous` is either updating or exiting.
//! 3. Entering and updating follow `next` order; exiting follows `previous`
//!    order.
//! 4. Reconciling a generation against itself yields only updating entries
//!    whose two sides are identical.

use std::collections::HashMap;

use bubble_core::geometry::Point;
use bubble_layout::{Generation, LayoutNode};

/// Lifecycle class of an identity within one update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Present only in the new generation.
    Entering,
    /// Present in both generations.
    Updating,
    /// Present only in the previous generation.
    Exiting,
}

/// One classified identity: the node on each side, where present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change<'a> {
    /// Node in the previous generation.
    pub previous: Option<&'a LayoutNode>,
    /// Node in the new generation.
    pub next: Option<&'a LayoutNode>,
}

impl<'a> Change<'a> {
    /// The identity key.
    #[must_use]
    pub fn id(&self) -> &'a str {
        match (self.next, self.previous) {
            (Some(node), _) | (None, Some(node)) => node.id(),
            (None, None) => "",
        }
    }

    /// Class implied by which sides are present.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.previous, self.next) {
            (None, _) => Phase::Entering,
            (Some(_), Some(_)) => Phase::Updating,
            (Some(_), None) => Phase::Exiting,
        }
    }
}

/// Result of [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation<'a> {
    /// `(None, Some(new))` pairs.
    pub entering: Vec<Change<'a>>,
    /// `(Some(old), Some(new))` pairs.
    pub updating: Vec<Change<'a>>,
    /// `(Some(old), None)` pairs.
    pub exiting: Vec<Change<'a>>,
}

impl Reconciliation<'_> {
    /// Total classified identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entering.len() + self.updating.len() + self.exiting.len()
    }

    /// Whether nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every visual identity of `previous` and `next`.
///
/// `previous` is `None` on the first cycle, which makes everything entering.
#[must_use]
pub fn reconcile<'a>(previous: Option<&'a Generation>, next: &'a Generation) -> Reconciliation<'a> {
    let old: HashMap<&str, &LayoutNode> = previous
        .into_iter()
        .flat_map(Generation::visible)
        .map(|n| (n.id(), n))
        .collect();

    let mut result = Reconciliation::default();
    let mut matched = 0usize;
    for node in next.visible() {
        match old.get(node.id()) {
            Some(&prev) => {
                matched += 1;
                result.updating.push(Change {
                    previous: Some(prev),
                    next: Some(node),
                });
            }
            None => result.entering.push(Change {
                previous: None,
                next: Some(node),
            }),
        }
    }

    if matched < old.len()
        && let Some(previous) = previous
    {
        for node in previous.visible() {
            if next.find(node.id()).is_none_or(|n| !n.is_visible()) {
                result.exiting.push(Change {
                    previous: Some(node),
                    next: None,
                });
            }
        }
    }

    result
}

/// Where an exiting node flies to: the canvas edge along the ray from the
/// canvas center through the node.
#[must_use]
pub fn exit_destination(node: &LayoutNode, side: f64) -> Point {
    let half = side / 2.0;
    let theta = (node.y - half).atan2(node.x - half);
    Point::new(half * (1.0 + theta.cos()), half * (1.0 + theta.sin()))
}
