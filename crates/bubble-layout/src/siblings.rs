#![forbid(unsafe_code)]

//! Front-chain packing of sibling circles.
//!
//! Circles are placed in the given order. The first three are laid out
//! mutually tangent; every further circle is placed tangent to the current
//! front pair `(a, b)`. The front chain is then scanned outward from the pair
//! in both directions, always advancing the side with the shorter traversed
//! length. If an intersecting chain circle is found, the front pair is backed
//! up to it and placement is retried. Otherwise the new circle is spliced
//! into the chain between `a` and `b`, and the chain pair whose weighted
//! midpoint is closest to the origin becomes the next front pair.
//!
//! The chain is a circular doubly linked list stored as `next`/`prev` index
//! arrays, one slot per input circle.
//!
//! # Invariants
//!
//! 1. On return no two input circles overlap (beyond a tolerance of 1e-6
//!    of their combined radii).
//! 2. The returned radius encloses every circle, and the circles are
//!    translated so that the enclosing circle is centered on the origin.
//! 3. Results depend only on the input order and radii.

use bubble_core::geometry::Circle;

use crate::enclose::enclose;

/// Pack `circles` in place (radii are read, positions overwritten).
///
/// Returns the radius of the circle enclosing the packed cluster, which is
/// centered on the origin. Zero-radius circles should be filtered out by the
/// caller; they carry no area to pack.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    circles[2] = place(circles[1], circles[0], circles[2]);

    // Front chain a -> b -> c -> a.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    next[0] = 1;
    next[1] = 2;
    next[2] = 0;
    prev[0] = 2;
    prev[1] = 0;
    prev[2] = 1;
    let (mut a, mut b) = (0usize, 1usize);

    let mut i = 3;
    'pack: while i < n {
        let c = i;
        circles[c] = place(circles[a], circles[b], circles[c]);

        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].r, circles[a].r);
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        let mut best = score(circles, a, next[a]);
        let mut cursor = next[c];
        while cursor != b {
            let s = score(circles, cursor, next[cursor]);
            if s < best {
                a = cursor;
                best = s;
            }
            cursor = next[cursor];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }
    let Some(e) = enclose(&chain) else {
        return 0.0;
    };

    for circle in circles.iter_mut() {
        circle.x -= e.x;
        circle.y -= e.y;
    }
    e.r
}

/// Position `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, mut c: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
    c
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = (a.r + b.r) * (1.0 - 1e-6);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the radius-weighted midpoint of a
/// chain pair.
fn score(circles: &[Circle], a: usize, b: usize) -> f64 {
    let (a, b) = (circles[a], circles[b]);
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circles(radii: &[f64]) -> Vec<Circle> {
        radii.iter().map(|&r| Circle::new(0.0, 0.0, r)).collect()
    }

    fn assert_packed(packed: &[Circle], enclosing: f64) {
        for (i, a) in packed.iter().enumerate() {
            for b in &packed[i + 1..] {
                assert!(a.gap(b) > -1e-6, "{a:?} overlaps {b:?}");
            }
            let outer = Circle::new(0.0, 0.0, enclosing);
            assert!(outer.inner_clearance(a) > -1e-6, "{a:?} escapes r={enclosing}");
        }
    }

    #[test]
    fn empty_packs_to_zero() {
        assert_eq!(pack_siblings(&mut []), 0.0);
    }

    #[test]
    fn single_circle_centered() {
        let mut c = circles(&[4.0]);
        assert_eq!(pack_siblings(&mut c), 4.0);
        assert_eq!(c[0], Circle::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn two_circles_tangent() {
        let mut c = circles(&[3.0, 1.0]);
        let r = pack_siblings(&mut c);
        assert_eq!(r, 4.0);
        assert!(c[0].gap(&c[1]).abs() < 1e-9);
    }

    #[test]
    fn three_circles_mutually_tangent() {
        let mut c = circles(&[2.0, 2.0, 2.0]);
        let r = pack_siblings(&mut c);
        assert!(c[0].gap(&c[1]).abs() < 1e-9);
        assert!(c[1].gap(&c[2]).abs() < 1e-9);
        assert!(c[0].gap(&c[2]).abs() < 1e-9);
        assert_packed(&c, r);
    }

    #[test]
    fn many_equal_circles_do_not_overlap() {
        let mut c = circles(&[1.0; 30]);
        let r = pack_siblings(&mut c);
        assert_packed(&c, r);
        // 30 unit circles need at least sqrt(30) area-wise.
        assert!(r >= 30f64.sqrt());
    }

    #[test]
    fn mixed_sizes_do_not_overlap() {
        let radii: Vec<f64> = (1..=25).rev().map(|v| f64::from(v).sqrt()).collect();
        let mut c = circles(&radii);
        let r = pack_siblings(&mut c);
        assert_packed(&c, r);
    }

    #[test]
    fn packing_is_deterministic() {
        let radii = [5.0, 3.0, 3.0, 2.0, 1.5, 1.0, 0.5, 0.25];
        let mut a = circles(&radii);
        let mut b = circles(&radii);
        let ra = pack_siblings(&mut a);
        let rb = pack_siblings(&mut b);
        assert_eq!(ra.to_bits(), rb.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn place_is_tangent_to_both() {
        let a = Circle::new(0.0, 0.0, 2.0);
        let b = Circle::new(5.0, 0.0, 3.0);
        let c = place(b, a, Circle::new(0.0, 0.0, 1.0));
        assert!(a.gap(&c).abs() < 1e-9);
        assert!(b.gap(&c).abs() < 1e-9);
    }
}
