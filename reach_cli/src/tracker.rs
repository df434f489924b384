//! Simulated effector tracker.
//!
//! Stands in for a camera-based hand tracker so the binary runs end to end
//! without hardware: a bounded random walk over the normalized channel space.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reach_traits::Tracker;

/// Per-tick maximum excursion of the simulated hand.
const STEP: f32 = 0.02;

pub struct SimTracker {
    position: Vec<f32>,
    rng: StdRng,
}

impl SimTracker {
    /// Start at mid-range on every channel. A seed makes the walk
    /// reproducible; without one the walk differs per process.
    pub fn new(channels: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            position: vec![0.5; channels],
            rng,
        }
    }
}

impl Tracker for SimTracker {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        for v in &mut self.position {
            let delta: f32 = self.rng.random_range(-STEP..=STEP);
            *v = (*v + delta).clamp(0.0, 1.0);
        }
        Ok(self.position.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_stay_in_the_unit_range() {
        let mut t = SimTracker::new(5, Some(1));
        for _ in 0..500 {
            let p = t.current_position().unwrap();
            assert_eq!(p.len(), 5);
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)), "{p:?}");
        }
    }

    #[test]
    fn seeded_walks_are_reproducible() {
        let mut a = SimTracker::new(5, Some(9));
        let mut b = SimTracker::new(5, Some(9));
        for _ in 0..20 {
            assert_eq!(a.current_position().unwrap(), b.current_position().unwrap());
        }
    }
}
