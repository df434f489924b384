//! Dwell/timeout state machine for one condition run.
//!
//! Each tick consumes the current effector position and decides whether the
//! trial is still being acquired, has been held long enough to succeed, or
//! has run out of time and must advance. The machine re-arms itself after
//! every terminal event and keeps running until the configured trial count
//! is reached.

use crate::error::{Result, TaskError};
use crate::target::TargetGenerator;
use rand::Rng;

/// Per-run acquisition parameters, immutable during a condition.
#[derive(Debug, Clone)]
pub struct TrialCfg {
    /// Max-norm containment tolerance.
    pub size: f32,
    /// Continuous dwell required inside the tolerance band (ms).
    pub hold_ms: u64,
    /// Forced-advance timeout per trial (ms).
    pub timeout_ms: u64,
    /// Trial count, including the initial trial later excluded from scoring.
    pub trials: usize,
    /// Effector channel count; positions and targets must match it.
    pub channels: usize,
}

impl Default for TrialCfg {
    fn default() -> Self {
        Self {
            size: 0.15,
            hold_ms: 500,
            timeout_ms: 20_000,
            trials: 8,
            channels: 5,
        }
    }
}

impl TrialCfg {
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(eyre::Report::new(TaskError::Config(
                "target size must be > 0".into(),
            )));
        }
        if self.hold_ms == 0 {
            return Err(eyre::Report::new(TaskError::Config(
                "hold time must be >= 1ms".into(),
            )));
        }
        if self.timeout_ms <= self.hold_ms {
            return Err(eyre::Report::new(TaskError::Config(
                "trial timeout must exceed the hold time".into(),
            )));
        }
        // One trial would leave nothing to score after the first is discarded.
        if self.trials < 2 {
            return Err(eyre::Report::new(TaskError::Config(
                "trial count must be >= 2".into(),
            )));
        }
        if self.channels == 0 {
            return Err(eyre::Report::new(TaskError::Config(
                "channel count must be >= 1".into(),
            )));
        }
        Ok(())
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialStatus {
    /// Waiting for the position to enter the tolerance band.
    Armed,
    /// Inside the band; dwell timer running.
    Dwelling,
    /// Held for the full dwell time; duration is wall time since trial start.
    Succeeded { trial: usize, duration_ms: u64 },
    /// Forced advance; duration is the timeout itself, a fixed penalty.
    TimedOut { trial: usize, duration_ms: u64 },
    /// All configured trials recorded; the run is over.
    Finished,
}

pub struct TrialRun<R: Rng> {
    cfg: TrialCfg,
    generator: TargetGenerator<R>,
    target: Vec<f32>,
    /// Time the band was first continuously entered; None while armed.
    dwell_entry_ms: Option<u64>,
    trial_start_ms: u64,
    durations_ms: Vec<u64>,
    successes: u32,
    first_success_ms: Option<u64>,
}

impl<R: Rng> TrialRun<R> {
    /// Create a run and draw its first target. `now_ms` anchors the first
    /// trial's start time.
    pub fn new(cfg: TrialCfg, mut generator: TargetGenerator<R>, now_ms: u64) -> Result<Self> {
        cfg.validate()?;
        let target = generator.next_target();
        if target.len() != cfg.channels {
            return Err(eyre::Report::new(TaskError::Config(format!(
                "target generator produced {} channels, expected {}",
                target.len(),
                cfg.channels
            ))));
        }
        let trials = cfg.trials;
        Ok(Self {
            cfg,
            generator,
            target,
            dwell_entry_ms: None,
            trial_start_ms: now_ms,
            durations_ms: Vec::with_capacity(trials),
            successes: 0,
            first_success_ms: None,
        })
    }

    pub fn target(&self) -> &[f32] {
        &self.target
    }

    /// Index of the trial currently being acquired (0-based).
    pub fn trial_index(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_finished(&self) -> bool {
        self.durations_ms.len() >= self.cfg.trials
    }

    pub fn durations_ms(&self) -> &[u64] {
        &self.durations_ms
    }

    /// Consume the run, returning the recorded trial durations.
    pub fn into_durations(self) -> Vec<u64> {
        self.durations_ms
    }

    /// Live metric: successes per minute since the first success. Defined
    /// only once at least one trial has succeeded. Observational only.
    pub fn successes_per_minute(&self, now_ms: u64) -> Option<f32> {
        let first = self.first_success_ms?;
        let elapsed = now_ms.saturating_sub(first);
        if elapsed == 0 {
            return None;
        }
        Some(60_000.0 * self.successes as f32 / elapsed as f32)
    }

    /// Advance one tick.
    ///
    /// The containment/success check runs before the timeout check: a
    /// success in the same tick resets the trial start, so the fresh trial
    /// cannot time out until a later tick.
    pub fn step(&mut self, position: &[f32], now_ms: u64) -> Result<TrialStatus> {
        if self.is_finished() {
            return Ok(TrialStatus::Finished);
        }
        self.check_position(position)?;

        let mut status = if self.contained(position) {
            match self.dwell_entry_ms {
                None => {
                    self.dwell_entry_ms = Some(now_ms);
                    TrialStatus::Dwelling
                }
                Some(entered) if now_ms.saturating_sub(entered) >= self.cfg.hold_ms => {
                    let trial = self.trial_index();
                    let duration_ms = now_ms.saturating_sub(self.trial_start_ms);
                    self.durations_ms.push(duration_ms);
                    self.successes += 1;
                    if self.first_success_ms.is_none() {
                        self.first_success_ms = Some(now_ms);
                    }
                    tracing::debug!(trial, duration_ms, "trial acquired");
                    self.advance(now_ms);
                    TrialStatus::Succeeded { trial, duration_ms }
                }
                Some(_) => TrialStatus::Dwelling,
            }
        } else {
            // Any excursion forfeits accumulated dwell time outright.
            self.dwell_entry_ms = None;
            TrialStatus::Armed
        };

        // Timeout is checked after containment so a same-tick success wins;
        // it can still fire mid-dwell when the trial clock runs out.
        if !self.is_finished() && now_ms.saturating_sub(self.trial_start_ms) >= self.cfg.timeout_ms
        {
            let trial = self.trial_index();
            let duration_ms = self.cfg.timeout_ms;
            self.durations_ms.push(duration_ms);
            tracing::debug!(trial, duration_ms, "trial timed out");
            self.advance(now_ms);
            status = TrialStatus::TimedOut { trial, duration_ms };
        }

        Ok(status)
    }

    fn contained(&self, position: &[f32]) -> bool {
        position
            .iter()
            .zip(&self.target)
            .all(|(p, t)| (p - t).abs() < self.cfg.size)
    }

    /// Re-arm for the next trial: new target, cleared dwell timer, fresh
    /// trial start.
    fn advance(&mut self, now_ms: u64) {
        self.target = self.generator.next_target();
        self.dwell_entry_ms = None;
        self.trial_start_ms = now_ms;
    }

    /// Malformed input is fatal for the run; the machine never substitutes
    /// defaults.
    fn check_position(&self, position: &[f32]) -> Result<()> {
        if position.len() != self.cfg.channels {
            return Err(eyre::Report::new(TaskError::Input(format!(
                "position has {} channels, expected {}",
                position.len(),
                self.cfg.channels
            ))));
        }
        if position.iter().any(|v| !v.is_finite()) {
            return Err(eyre::Report::new(TaskError::Input(
                "position contains a non-finite value".into(),
            )));
        }
        Ok(())
    }
}

impl<R: Rng> core::fmt::Debug for TrialRun<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TrialRun")
            .field("trial", &self.trial_index())
            .field("target", &self.target)
            .field("dwelling", &self.dwell_entry_ms.is_some())
            .field("successes", &self.successes)
            .finish()
    }
}
