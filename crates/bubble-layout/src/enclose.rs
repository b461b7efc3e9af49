#![forbid(unsafe_code)]

//! Smallest circle enclosing a set of circles.
//!
//! Incremental basis construction (Matoušek–Sharir–Welzl): walk the input,
//! and whenever a circle is not weakly enclosed by the current answer,
//! extend the basis (at most three circles) with it and restart. Input order
//! is used as given, so the result is fully deterministic.
//!
//! # Failure Modes
//!
//! If floating-point degeneracy prevents any basis from covering the set, a
//! bounding-box based circle is returned instead. It encloses every input but
//! is not minimal.

use bubble_core::geometry::Circle;

/// Smallest circle enclosing every circle in `circles`.
///
/// Returns `None` for empty input.
#[must_use]
pub fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut basis: Vec<Circle> = Vec::with_capacity(3);
    let mut current: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        if let Some(e) = current
            && encloses_weak(&e, &p)
        {
            i += 1;
            continue;
        }
        match extend_basis(&basis, p) {
            Some(next) => {
                basis = next;
                current = Some(enclose_basis(&basis));
                i = 0;
            }
            None => return Some(bounding_enclosure(circles)),
        }
    }
    current
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose_basis2(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

/// `b` is not entirely inside `a`.
fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

/// `b` is inside `a`, with a relative tolerance.
fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => Circle::default(),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = x21.hypot(y21);
    if l <= f64::EPSILON {
        return if a.r >= b.r { *a } else { *b };
    }
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    // Collinear centers give a non-finite circle, which every caller rejects.
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

fn bounding_enclosure(circles: &[Circle]) -> Circle {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in circles {
        min_x = min_x.min(c.x - c.r);
        min_y = min_y.min(c.y - c.r);
        max_x = max_x.max(c.x + c.r);
        max_y = max_y.max(c.y + c.r);
    }
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;
    let r = circles
        .iter()
        .map(|c| (c.x - cx).hypot(c.y - cy) + c.r)
        .fold(0.0, f64::max);
    Circle::new(cx, cy, r)
}
