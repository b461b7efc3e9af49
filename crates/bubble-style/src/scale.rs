#![forbid(unsafe_code)]

//! Quantize scales: a continuous domain split into equal-width buckets.
//!
//! # Invariants
//!
//! 1. `bucket(min) == 0` and `bucket(max) == len - 1`.
//! 2. `bucket` is monotonic non-decreasing over the domain.
//! 3. A degenerate domain (`min >= max`), a NaN input, or a value below the
//!    domain maps to bucket 0. Values above the domain map to the last
//!    bucket. No input panics or divides by zero.

use serde::{Deserialize, Serialize};

/// Closed numeric domain `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Domain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Domain {
    /// Create a domain.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extrema of the finite values, or `[0, 0]` when there are none.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut extent: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        let (min, max) = extent.unwrap_or((0.0, 0.0));
        Self { min, max }
    }

    /// Width of the domain; 0 when degenerate.
    #[must_use]
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span.is_finite() && span > 0.0 { span } else { 0.0 }
    }

    /// Whether `min >= max` (or either bound is not finite).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }
}

/// Maps a continuous domain onto a discrete range of `N` outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeScale<T> {
    domain: Domain,
    range: Vec<T>,
}

impl<T> QuantizeScale<T> {
    /// Create a scale over `domain` with the given outputs.
    #[must_use]
    pub fn new(domain: Domain, range: Vec<T>) -> Self {
        Self { domain, range }
    }

    /// The domain.
    #[must_use]
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The outputs, one per bucket.
    #[must_use]
    pub fn range(&self) -> &[T] {
        &self.range
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the scale has no outputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Bucket index of `value`: `floor(N * (v - min) / (max - min))`,
    /// clamped to `[0, N - 1]`.
    #[must_use]
    pub fn bucket(&self, value: f64) -> usize {
        let n = self.range.len();
        let span = self.domain.span();
        if n <= 1 || span == 0.0 {
            return 0;
        }
        let t = (value - self.domain.min) / span;
        if t.is_nan() || t <= 0.0 {
            return 0;
        }
        let scaled = (n as f64 * t).floor();
        if scaled >= (n - 1) as f64 {
            n - 1
        } else {
            scaled as usize
        }
    }

    /// Output for `value`; `None` only when the range is empty.
    #[must_use]
    pub fn map(&self, value: f64) -> Option<&T> {
        self.range.get(self.bucket(value))
    }

    /// Output for bucket `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.range.get(index)
    }

    /// Sub-interval of the domain covered by bucket `index`.
    ///
    /// With a degenerate domain every bucket reports `[min, max]`.
    #[must_use]
    pub fn bucket_extent(&self, index: usize) -> Option<(f64, f64)> {
        if index >= self.range.len() {
            return None;
        }
        let span = self.domain.span();
        if span == 0.0 {
            return Some((self.domain.min, self.domain.max));
        }
        let n = self.range.len() as f64;
        let lo = self.domain.min + span * index as f64 / n;
        let hi = self.domain.min + span * (index + 1) as f64 / n;
        Some((lo, hi))
    }
}
