//! Property-based invariant tests for tooltip placement.
//!
//! 1. A box that fits the container (with margins) is placed fully inside it.
//! 2. An unclamped placement never covers the node horizontally.
//! 3. The right side wins whenever it fits.

use bubble_chart::{Side, position_tooltip};
use bubble_core::geometry::{Circle, Size};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Case {
    container: Size,
    tooltip: Size,
    margin: f64,
    node: Circle,
}

/// A node inside the container and a box that fits with margins on both sides.
fn case_strategy() -> impl Strategy<Value = Case> {
    (50.0f64..1000.0, 50.0f64..1000.0, 0.0f64..10.0)
        .prop_flat_map(|(w, h, margin)| {
            let max_r = w.min(h) / 2.0;
            (
                Just(Size::new(w, h)),
                Just(margin),
                1.0f64..(w - 2.0 * margin),
                1.0f64..(h - 2.0 * margin),
                0.0f64..max_r,
                0.0f64..=1.0,
                0.0f64..=1.0,
            )
        })
        .prop_map(|(container, margin, tw, th, r, fx, fy)| {
            let x = r + fx * (container.width - 2.0 * r);
            let y = r + fy * (container.height - 2.0 * r);
            Case {
                container,
                tooltip: Size::new(tw, th),
                margin,
                node: Circle::new(x, y, r),
            }
        })
}

const EPS: f64 = 1e-9;

// ═════════════════════════════════════════════════════════════════════════
// 1. In bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fitting_box_stays_in_container(case in case_strategy()) {
        let p = position_tooltip(&case.node, case.container, case.tooltip, case.margin);
        prop_assert!(p.left >= -EPS, "left {} < 0", p.left);
        prop_assert!(p.top >= -EPS, "top {} < 0", p.top);
        prop_assert!(p.left + case.tooltip.width <= case.container.width + EPS,
            "right edge {} > {}", p.left + case.tooltip.width, case.container.width);
        prop_assert!(p.top + case.tooltip.height <= case.container.height + EPS,
            "bottom edge {} > {}", p.top + case.tooltip.height, case.container.height);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No horizontal overlap unless clamped
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unclamped_box_clears_node(case in case_strategy()) {
        let p = position_tooltip(&case.node, case.container, case.tooltip, case.margin);
        prop_assume!(!p.clamped);
        let n = case.node;
        match p.side {
            Side::Right => prop_assert!(p.left >= n.x + n.r - EPS),
            Side::Left => prop_assert!(p.left + case.tooltip.width <= n.x - n.r + EPS),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Right preferred
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn right_preferred_when_it_fits(case in case_strategy()) {
        let n = case.node;
        let right = n.x + n.r + case.margin;
        prop_assume!(right + case.tooltip.width <= case.container.width);
        let p = position_tooltip(&n, case.container, case.tooltip, case.margin);
        prop_assert_eq!(p.side, Side::Right);
        prop_assert!(!p.clamped);
        prop_assert!((p.left - right).abs() < EPS);
    }
}
