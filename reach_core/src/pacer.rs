//! Frame pacing for the trial loop.
//!
//! The pacer is the loop's only suspension point. Each tick re-measures from
//! "now" instead of a fixed schedule, so a slow tick never accumulates a
//! backlog of missed frames; the loop simply runs at the achieved rate.

use crate::util::period_ms;
use reach_traits::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct FramePacer {
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    last_tick_ms: u64,
}

impl FramePacer {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let epoch = clock.now();
        Self {
            clock,
            epoch,
            last_tick_ms: 0,
        }
    }

    /// Milliseconds since pacer construction. Monotonic, never resets.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    /// Block until at least one frame period has elapsed since the previous
    /// tick. A tick that already overran its period returns immediately.
    pub fn tick(&mut self, rate_hz: u32) {
        let period = period_ms(rate_hz);
        let now = self.elapsed_ms();
        let since_last = now.saturating_sub(self.last_tick_ms);
        let remaining = period.saturating_sub(since_last);
        if remaining > 0 {
            self.clock.sleep(Duration::from_millis(remaining));
        }
        // Re-measure after the sleep: an overrun leaves no backlog, the next
        // frame budget starts from wherever this tick actually finished.
        self.last_tick_ms = self.elapsed_ms();
    }
}

impl core::fmt::Debug for FramePacer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FramePacer")
            .field("elapsed_ms", &self.elapsed_ms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_traits::clock::test_clock::TestClock;

    #[test]
    fn elapsed_is_monotonic() {
        let clock = TestClock::new();
        let pacer = FramePacer::new(Arc::new(clock.clone()));
        assert_eq!(pacer.elapsed_ms(), 0);
        clock.advance(Duration::from_millis(40));
        assert_eq!(pacer.elapsed_ms(), 40);
        clock.advance(Duration::from_millis(10));
        assert_eq!(pacer.elapsed_ms(), 50);
    }

    #[test]
    fn tick_sleeps_the_remaining_period() {
        let clock = TestClock::new();
        let mut pacer = FramePacer::new(Arc::new(clock.clone()));
        // Nothing has elapsed; a 30Hz tick should advance by a full period.
        pacer.tick(30);
        assert_eq!(pacer.elapsed_ms(), 33);
    }

    #[test]
    fn overrun_tick_does_not_sleep_or_queue() {
        let clock = TestClock::new();
        let mut pacer = FramePacer::new(Arc::new(clock.clone()));
        pacer.tick(30);
        // Simulate a slow tick body: two periods pass before the next tick.
        clock.advance(Duration::from_millis(70));
        let before = pacer.elapsed_ms();
        pacer.tick(30);
        // No sleep issued; the loop continues at the achieved rate.
        assert_eq!(pacer.elapsed_ms(), before);
    }
}
