//! Per-condition trial loop.
//!
//! One synchronous tick: read the tracker, resolve the position through the
//! source, advance the state machine, feed the recorder/presenter, then
//! pace the frame. The pacer is the only suspension point; cancellation is
//! observed between ticks only, never mid-evaluation, so dwell accounting
//! stays consistent.

use crate::error::{Result, TaskError};
use crate::pacer::FramePacer;
use crate::source::PositionSource;
use crate::trial::TrialRun;
use rand::Rng;
use reach_traits::{Clock, Presenter, Recorder, Tracker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Loop parameters for one condition run.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Condition label for live status text and logs.
    pub label: String,
    pub frame_rate_hz: u32,
    /// Feed the recorder each tick while set.
    pub recording: bool,
}

/// Drive one trial run to completion, returning its recorded durations.
///
/// Transient tracker failures skip the whole tick (no state mutation) and
/// retry at frame granularity. When a decoder is present the source is
/// switched online on the first good reading, seeding the decoder with it.
pub fn run_condition<R: Rng>(
    tracker: &mut dyn Tracker,
    source: &mut PositionSource,
    mut run: TrialRun<R>,
    clock: Arc<dyn Clock + Send + Sync>,
    params: &RunParams,
    recorder: &mut dyn Recorder,
    presenter: &mut dyn Presenter,
    cancel: &AtomicBool,
) -> Result<Vec<u64>> {
    let mut pacer = FramePacer::new(clock);
    tracing::info!(label = %params.label, "condition start");

    loop {
        if cancel.load(Ordering::Relaxed) {
            // The cancellation error wins; a flush failure is only logged.
            if params.recording
                && let Err(e) = recorder.flush()
            {
                tracing::warn!(error = %e, "flush failed during cancellation");
            }
            tracing::warn!(label = %params.label, "condition cancelled");
            return Err(eyre::Report::new(TaskError::Cancelled));
        }

        let raw = match tracker.current_position() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "tracker reading unavailable, skipping tick");
                pacer.tick(params.frame_rate_hz);
                continue;
            }
        };

        if source.has_decoder() && !source.is_online() {
            source.set_online(true, &raw)?;
        }
        let position = source.resolve(&raw)?;

        let now_ms = pacer.elapsed_ms();
        run.step(&position, now_ms)?;

        if params.recording {
            recorder
                .record(
                    now_ms,
                    run.trial_index(),
                    &position,
                    run.target(),
                    source.is_online(),
                )
                .map_err(|e| eyre::eyre!("recording sample: {e}"))?;
        }

        let spm = run
            .successes_per_minute(now_ms)
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        presenter.live(&format!(
            "[{}] pos {:.2?} | successes/min {}",
            params.label, position, spm
        ));

        if run.is_finished() {
            break;
        }
        pacer.tick(params.frame_rate_hz);
    }

    if params.recording {
        recorder
            .flush()
            .map_err(|e| eyre::eyre!("flushing recorder: {e}"))?;
    }
    let durations = run.into_durations();
    tracing::info!(
        label = %params.label,
        trials = durations.len(),
        "condition complete"
    );
    Ok(durations)
}
