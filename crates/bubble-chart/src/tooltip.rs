#![forbid(unsafe_code)]

//! Tooltip placement next to a highlighted bubble, and tooltip content rows.
//!
//! # Invariants
//!
//! 1. Whenever the tooltip box fits inside the container (with the margin),
//!    the placed box lies entirely within `[0, W] x [0, H]`.
//! 2. The right side is preferred; the left side is used only when the right
//!    placement would overflow and the left one starts at `x >= 0`.
//! 3. Placement depends only on the node geometry, so it must be recomputed
//!    after every layout change even when the target id is unchanged.
//!
//! # Failure Modes
//!
//! A box wider or taller than the container cannot fit; the fallback still
//! anchors it to the right/bottom edge, which may yield a negative offset.

use bubble_core::geometry::{Circle, Size};
use bubble_layout::DataItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Which side of the node the tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left of the node; a pointer arrow would face right.
    Left,
    /// Right of the node (or clamped to the container's right edge).
    Right,
}

/// Resolved tooltip box position, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    /// Distance of the box's top edge from the container top.
    pub top: f64,
    /// Distance of the box's left edge from the container left.
    pub left: f64,
    /// Side branch taken.
    pub side: Side,
    /// Neither side fit; the box was pushed against the right edge.
    pub clamped: bool,
}

/// Place a `tooltip`-sized box next to `node` inside `container`.
#[must_use]
pub fn position_tooltip(
    node: &Circle,
    container: Size,
    tooltip: Size,
    margin: f64,
) -> TooltipPlacement {
    let mut top = node.y - tooltip.height / 2.0;
    if top < 0.0 {
        top = margin;
    } else if top + tooltip.height > container.height {
        top = container.height - tooltip.height - margin;
    }

    let right = node.x + node.r + margin;
    let left = node.x - node.r - tooltip.width - margin;
    let (left, side, clamped) = if right + tooltip.width <= container.width {
        (right, Side::Right, false)
    } else if left >= 0.0 {
        (left, Side::Left, false)
    } else {
        (container.width - tooltip.width - margin, Side::Right, true)
    };

    TooltipPlacement {
        top,
        left,
        side,
        clamped,
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// One configured tooltip line: a bare property name or a styled row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TooltipProp {
    /// Property name; also used as the row label.
    Name(String),
    /// Property with a style class and optional display label.
    Styled {
        /// Style class applied to the row by the renderer.
        css: String,
        /// Property name looked up on the item.
        prop: String,
        /// Row label; defaults to `prop`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<String>,
    },
}

impl TooltipProp {
    /// Property name looked up on the item.
    #[must_use]
    pub fn prop(&self) -> &str {
        match self {
            Self::Name(prop) | Self::Styled { prop, .. } => prop,
        }
    }

    /// Row label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Name(prop) => prop,
            Self::Styled { prop, display, .. } => display.as_deref().unwrap_or(prop),
        }
    }

    /// Style class, if any.
    #[must_use]
    pub fn css(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Styled { css, .. } => Some(css),
        }
    }
}

impl From<&str> for TooltipProp {
    fn from(prop: &str) -> Self {
        Self::Name(prop.to_string())
    }
}

/// A resolved tooltip line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipRow {
    /// Style class, if configured.
    pub css: Option<String>,
    /// Row label.
    pub label: String,
    /// Formatted property value.
    pub value: String,
}

/// Resolve `props` against `item`. Props the item does not carry are skipped.
#[must_use]
pub fn tooltip_rows(item: &DataItem, props: &[TooltipProp]) -> Vec<TooltipRow> {
    props
        .iter()
        .filter_map(|p| {
            let value = item.get(p.prop())?;
            Some(TooltipRow {
                css: p.css().map(str::to_string),
                label: p.label().to_string(),
                value: format_value(&value),
            })
        })
        .collect()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Current tooltip: target, box size, resolved placement, and content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipState {
    /// Highlighted id, kept even while the tooltip is hidden.
    pub target: Option<String>,
    /// Size of the tooltip box as measured by the host.
    pub size: Size,
    /// Placement for the target's current geometry.
    pub placement: Option<TooltipPlacement>,
    /// Content rows for the target.
    pub rows: Vec<TooltipRow>,
}

impl TooltipState {
    /// Whether the tooltip should be drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.target.is_some() && self.placement.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
