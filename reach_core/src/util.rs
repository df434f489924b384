//! Common time and rounding helpers for reach_core.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the frame period in milliseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Round a channel value to two decimal places (generated targets are
/// published at centimeter-of-flexion granularity).
#[inline]
pub fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

/// `n` evenly spaced points spanning `[lo, hi]` inclusive.
pub fn linspace(lo: f32, hi: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / ((n - 1) as f32);
            (0..n).map(|i| lo + step * (i as f32)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_clamps_and_rounds_down() {
        assert_eq!(period_ms(30), 33);
        assert_eq!(period_ms(1000), 1);
        assert_eq!(period_ms(0), 1000);
        // Sub-millisecond periods clamp to 1ms.
        assert_eq!(period_ms(4000), 1);
    }

    #[test]
    fn round2_truncates_to_hundredths() {
        assert_eq!(round2(0.123), 0.12);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn linspace_spans_range_inclusive() {
        let pts = linspace(0.05, 0.95, 10);
        assert_eq!(pts.len(), 10);
        assert!((pts[0] - 0.05).abs() < 1e-6);
        assert!((pts[9] - 0.95).abs() < 1e-6);
        for w in pts.windows(2) {
            assert!(w[1] > w[0]);
        }
    }
}
