#![forbid(unsafe_code)]

//! Per-item start offsets for otherwise simultaneous transitions.
//!
//! A batch of transitions cascades instead of starting in a single uniform
//! "pop": item `i` waits `i * delay` before it starts moving.
//!
//! # Invariants
//!
//! 1. Item 0 never waits.
//! 2. `stagger_offset(i, delay) == i * delay` exactly (integer arithmetic).
//! 3. Offsets saturate at `Duration::MAX` instead of overflowing.

use std::time::Duration;

/// Delay offset for the item at `index`.
#[must_use]
pub fn stagger_offset(index: usize, delay: Duration) -> Duration {
    delay.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_7: Duration = Duration::from_millis(7);

    #[test]
    fn first_item_starts_immediately() {
        assert_eq!(stagger_offset(0, MS_7), Duration::ZERO);
    }

    #[test]
    fn equal_spacing() {
        let offsets: Vec<Duration> = (0..4).map(|i| stagger_offset(i, MS_7)).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                MS_7,
                Duration::from_millis(14),
                Duration::from_millis(21)
            ]
        );
    }

    #[test]
    fn index_is_not_clamped_to_a_group_size() {
        assert_eq!(stagger_offset(10, MS_7), Duration::from_millis(70));
    }

    #[test]
    fn zero_delay_all_zero() {
        assert!((0..5).all(|i| stagger_offset(i, Duration::ZERO) == Duration::ZERO));
    }

    #[test]
    fn huge_index_saturates() {
        assert_eq!(stagger_offset(usize::MAX, Duration::MAX), Duration::MAX);
    }
}
