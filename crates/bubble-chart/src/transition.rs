#![forbid(unsafe_code)]

//! Time-based interpolation of per-node visuals.
//!
//! A [`Transition`] is pure: [`Transition::sample`] maps elapsed time to a
//! [`Visual`]. The [`TransitionScheduler`] owns a clock that only moves when
//! the host calls [`TransitionScheduler::advance`], and keeps one in-flight
//! transition per live identity plus the ghosts of exiting nodes.
//!
//! # Invariants
//!
//! 1. Numeric properties interpolate linearly; colors switch from the start
//!    to the end color once progress reaches one half.
//! 2. A new cycle restarts updating and exiting identities from their
//!    *current* sampled visual, never from the previous cycle's start or end.
//! 3. Every in-flight transition and ghost not named by the new cycle is
//!    dropped without completing.
//! 4. Completed transitions are pruned on `advance`; a pruned live node rests
//!    at its target.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bubble_core::animation::stagger::stagger_offset;
use bubble_core::animation::{Tween, lerp};
use bubble_layout::{DataItem, LayoutNode};
use bubble_style::{Color, NodeColors};

use crate::reconcile::Phase;

// ---------------------------------------------------------------------------
// Visual
// ---------------------------------------------------------------------------

/// Drawable properties of one node at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Circle radius.
    pub r: f64,
    /// Circle opacity in `[0, 1]`.
    pub opacity: f64,
    /// Label opacity in `[0, 1]`.
    pub label_opacity: f64,
    /// Circle fill.
    pub fill: Color,
    /// Label color.
    pub text: Color,
}

impl Visual {
    /// Fully shown visual of a laid-out node.
    #[must_use]
    pub fn resting(node: &LayoutNode, colors: &NodeColors) -> Self {
        Self {
            x: node.x,
            y: node.y,
            r: node.r,
            opacity: 1.0,
            label_opacity: 1.0,
            fill: colors.fill.clone(),
            text: colors.text.clone(),
        }
    }

    /// Where an entering node starts: its final position, radius 0, label
    /// hidden.
    #[must_use]
    pub fn entering(target: &Self) -> Self {
        Self {
            r: 0.0,
            label_opacity: 0.0,
            ..target.clone()
        }
    }

    /// Where an exiting node ends: at `(x, y)`, shrunk and transparent.
    #[must_use]
    pub fn exited(from: &Self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            r: 0.0,
            opacity: 0.0,
            label_opacity: 0.0,
            ..from.clone()
        }
    }

    /// Interpolate between `a` and `b` at progress `t`.
    #[must_use]
    pub fn interpolate(a: &Self, b: &Self, t: f64) -> Self {
        let (fill, text) = if t < 0.5 {
            (a.fill.clone(), a.text.clone())
        } else {
            (b.fill.clone(), b.text.clone())
        };
        Self {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            r: lerp(a.r, b.r, t),
            opacity: lerp(a.opacity, b.opacity, t),
            label_opacity: lerp(a.label_opacity, b.label_opacity, t),
            fill,
            text,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// One node's animation from a start visual to an end visual.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Phase that produced this transition.
    pub phase: Phase,
    /// Start visual.
    pub from: Visual,
    /// End visual.
    pub to: Visual,
    /// Timing.
    pub tween: Tween,
}

impl Transition {
    /// Create a transition.
    #[must_use]
    pub fn new(phase: Phase, from: Visual, to: Visual, tween: Tween) -> Self {
        Self {
            phase,
            from,
            to,
            tween,
        }
    }

    /// Visual at `elapsed` since the transition was scheduled.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> Visual {
        let t = self.tween.progress(elapsed);
        if t >= 1.0 {
            return self.to.clone();
        }
        Visual::interpolate(&self.from, &self.to, t)
    }

    /// Whether the transition has reached its end at `elapsed`.
    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.tween.is_complete(elapsed)
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// One node to animate in a new cycle.
#[derive(Debug, Clone)]
pub struct Keyframe {
    /// Identity key.
    pub id: String,
    /// Source item, for labels and tooltips of the animated node.
    pub item: Arc<DataItem>,
    /// Depth in the hierarchy.
    pub depth: usize,
    /// Class in this cycle.
    pub phase: Phase,
    /// Start visual when nothing is in flight for the id.
    pub from: Visual,
    /// End visual.
    pub to: Visual,
    /// Position in the stagger order of its group.
    pub index: usize,
}

#[derive(Debug, Clone)]
struct Track {
    item: Arc<DataItem>,
    depth: usize,
    transition: Transition,
    started: Duration,
}

/// A node as drawn in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    /// Identity key.
    pub id: String,
    /// Source item.
    pub item: Arc<DataItem>,
    /// Depth in the hierarchy.
    pub depth: usize,
    /// Whether the node is an exiting ghost.
    pub exiting: bool,
    /// Current visual.
    pub visual: Visual,
}

/// Owns the animation clock and every in-flight transition.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    clock: Duration,
    duration: Duration,
    delay: Duration,
    live: HashMap<String, Track>,
    ghosts: Vec<(String, Track)>,
}

impl TransitionScheduler {
    /// Create a scheduler with the given duration and per-node stagger step.
    #[must_use]
    pub fn new(duration: Duration, delay: Duration) -> Self {
        Self {
            clock: Duration::ZERO,
            duration,
            delay,
            live: HashMap::new(),
            ghosts: Vec::new(),
        }
    }

    /// Time advanced so far.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Whether anything is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.live.is_empty() || !self.ghosts.is_empty()
    }

    /// Number of in-flight live transitions.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.live.len()
    }

    /// Number of exiting ghosts still animating.
    #[must_use]
    pub fn ghosts(&self) -> usize {
        self.ghosts.len()
    }

    /// Start a new cycle, superseding everything in flight.
    pub fn begin(&mut self, keyframes: Vec<Keyframe>) {
        let now = self.clock;
        let mut current: HashMap<String, Visual> = self
            .live
            .drain()
            .map(|(id, track)| {
                let visual = track.transition.sample(now.saturating_sub(track.started));
                (id, visual)
            })
            .collect();
        let dropped_ghosts = self.ghosts.len();
        self.ghosts.clear();

        let mut restarted = 0usize;

        for kf in keyframes {
            let tween = Tween::new(self.duration).delay(stagger_offset(kf.index, self.delay));
            let from = match (kf.phase, current.remove(&kf.id)) {
                (Phase::Updating | Phase::Exiting, Some(sampled)) => {
                    restarted += 1;
                    sampled
                }
                _ => kf.from,
            };
            if from == kf.to && kf.phase == Phase::Updating {
                continue;
            }
            let track = Track {
                item: kf.item,
                depth: kf.depth,
                transition: Transition::new(kf.phase, from, kf.to, tween),
                started: now,
            };
            if kf.phase == Phase::Exiting {
                self.ghosts.push((kf.id, track));
            } else {
                self.live.insert(kf.id, track);
            }
        }

        tracing::trace!(
            restarted,
            discarded = current.len(),
            dropped_ghosts,
            live = self.live.len(),
            ghosts = self.ghosts.len(),
            "transitions scheduled"
        );
    }

    /// Move the clock forward and prune finished transitions.
    pub fn advance(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);
        let now = self.clock;
        let before = self.live.len() + self.ghosts.len();
        self.live
            .retain(|_, t| !t.transition.is_complete(now.saturating_sub(t.started)));
        self.ghosts
            .retain(|(_, t)| !t.transition.is_complete(now.saturating_sub(t.started)));
        let pruned = before - self.live.len() - self.ghosts.len();
        if pruned > 0 {
            tracing::trace!(pruned, clock_ms = now.as_millis() as u64, "transitions completed");
        }
    }

    /// Current visual of a live identity, if it is in flight.
    #[must_use]
    pub fn sample(&self, id: &str) -> Option<Visual> {
        self.live
            .get(id)
            .map(|t| t.transition.sample(self.clock.saturating_sub(t.started)))
    }

    /// Current frames of the exiting ghosts, in exit order.
    #[must_use]
    pub fn ghost_frames(&self) -> Vec<FrameNode> {
        self.ghosts
            .iter()
            .map(|(id, t)| FrameNode {
                id: id.clone(),
                item: Arc::clone(&t.item),
                depth: t.depth,
                exiting: true,
                visual: t.transition.sample(self.clock.saturating_sub(t.started)),
            })
            .collect()
    }

    /// Drop everything in flight.
    pub fn clear(&mut self) {
        self.live.clear();
        self.ghosts.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
