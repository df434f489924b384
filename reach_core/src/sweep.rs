//! Multi-condition sweep orchestration and summary statistics.
//!
//! The sweep runs one trial loop per (decoder × style) condition for every
//! configured DOF count, strictly sequentially (each condition exclusively
//! owns the tracker and decoder for its duration), and aggregates each
//! condition's trial durations into a results table.

use crate::error::{Result, TaskError};
use crate::runner::{self, RunParams};
use crate::source::PositionSource;
use crate::target::{TargetCfg, TargetGenerator, TargetStyle};
use crate::trial::{TrialCfg, TrialRun};
use rand::SeedableRng;
use rand::rngs::StdRng;
use reach_traits::{Clock, DecoderBank, Presenter, Recorder, Tracker};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Decoder label denoting the passthrough (no-decoder) row.
pub const GROUND_TRUTH: &str = "GT";

/// Full sweep configuration, immutable during a run.
#[derive(Debug, Clone)]
pub struct SweepParams {
    /// Decoder identifiers; [`GROUND_TRUTH`] rows run passthrough.
    pub decoders: Vec<String>,
    pub styles: Vec<TargetStyle>,
    pub dofs: Vec<u8>,
    pub trial: TrialCfg,
    pub frame_rate_hz: u32,
    /// Margin keeping targets away from the range boundary.
    pub edge: f32,
    /// Base seed; each condition derives its own stream from it.
    pub seed: Option<u64>,
    pub recording: bool,
}

/// One decoder's row in a per-DOF table: a median per style plus the mean
/// of those medians.
#[derive(Debug, Clone)]
pub struct SweepRow {
    pub decoder: String,
    pub medians_ms: Vec<f64>,
    pub combined_ms: f64,
}

#[derive(Debug, Clone)]
pub struct SweepTable {
    pub dof: u8,
    pub styles: Vec<TargetStyle>,
    pub rows: Vec<SweepRow>,
}

/// Completed sweep results, one table per DOF count. Read-only once built.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub tables: Vec<SweepTable>,
}

/// Run the full condition grid in deterministic order (DOF, then style,
/// then decoder) and assemble the results table.
///
/// A decoder that fails to load aborts the whole sweep: a partial results
/// table would be misleading. Fatal input errors from a condition propagate
/// for the same reason.
#[allow(clippy::too_many_arguments)]
pub fn run_sweep(
    params: &SweepParams,
    tracker: &mut dyn Tracker,
    bank: &mut dyn DecoderBank,
    recorder: &mut dyn Recorder,
    presenter: &mut dyn Presenter,
    clock: Arc<dyn Clock + Send + Sync>,
    cancel: &AtomicBool,
) -> Result<SweepReport> {
    params.trial.validate()?;
    if params.decoders.is_empty() || params.styles.is_empty() || params.dofs.is_empty() {
        return Err(eyre::Report::new(TaskError::Config(
            "sweep requires at least one decoder, style and DOF".into(),
        )));
    }

    let mut tables = Vec::with_capacity(params.dofs.len());
    let mut condition_index: u64 = 0;

    for &dof in &params.dofs {
        // medians[decoder][style], filled style-major to match run order
        let mut medians = vec![vec![0.0f64; params.styles.len()]; params.decoders.len()];

        for (style_idx, &style) in params.styles.iter().enumerate() {
            for (decoder_idx, name) in params.decoders.iter().enumerate() {
                let durations = run_one_condition(
                    params,
                    dof,
                    style,
                    name,
                    condition_index,
                    tracker,
                    bank,
                    recorder,
                    presenter,
                    clock.clone(),
                    cancel,
                )?;
                let median = median_excluding_first(&durations)?;
                tracing::info!(
                    dof,
                    style = style.as_str(),
                    decoder = %name,
                    median_ms = median,
                    "condition scored"
                );
                medians[decoder_idx][style_idx] = median;
                condition_index += 1;
            }
        }

        let rows = params
            .decoders
            .iter()
            .zip(medians)
            .map(|(decoder, medians_ms)| {
                let combined_ms = mean(&medians_ms);
                SweepRow {
                    decoder: decoder.clone(),
                    medians_ms,
                    combined_ms,
                }
            })
            .collect();
        tables.push(SweepTable {
            dof,
            styles: params.styles.clone(),
            rows,
        });
    }

    Ok(SweepReport { tables })
}

#[allow(clippy::too_many_arguments)]
fn run_one_condition(
    params: &SweepParams,
    dof: u8,
    style: TargetStyle,
    decoder_name: &str,
    condition_index: u64,
    tracker: &mut dyn Tracker,
    bank: &mut dyn DecoderBank,
    recorder: &mut dyn Recorder,
    presenter: &mut dyn Presenter,
    clock: Arc<dyn Clock + Send + Sync>,
    cancel: &AtomicBool,
) -> Result<Vec<u64>> {
    // Derived per-condition seed: reproducible sweep, decorrelated streams.
    let rng = match params.seed {
        Some(base) => StdRng::seed_from_u64(base.wrapping_add(condition_index)),
        None => StdRng::from_os_rng(),
    };
    let target_cfg = TargetCfg::hand(dof, style, params.trial.channels, params.edge);
    let generator = TargetGenerator::new(target_cfg, rng)?;
    let run = TrialRun::new(params.trial.clone(), generator, 0)?;

    // Fresh decoder per condition: the previous condition's state is fully
    // released before this one acquires the shared resources.
    let decoder = if decoder_name == GROUND_TRUTH {
        None
    } else {
        let loaded = bank.load(decoder_name).map_err(|e| {
            eyre::Report::new(TaskError::DecoderLoad {
                name: decoder_name.to_string(),
                reason: e.to_string(),
            })
        })?;
        Some(loaded)
    };
    let mut source = PositionSource::new(decoder);

    let run_params = RunParams {
        label: format!("dof{dof}/{}/{decoder_name}", style.as_str()),
        frame_rate_hz: params.frame_rate_hz,
        recording: params.recording,
    };
    runner::run_condition(
        tracker,
        &mut source,
        run,
        clock,
        &run_params,
        recorder,
        presenter,
        cancel,
    )
}

/// Cell statistic: median of all trial durations except the first, which is
/// discarded to remove cold-start bias.
pub fn median_excluding_first(durations_ms: &[u64]) -> Result<f64> {
    let scored = durations_ms.get(1..).unwrap_or_default();
    if scored.is_empty() {
        return Err(eyre::Report::new(TaskError::Config(
            "no scored trials after discarding the first".into(),
        )));
    }
    let mut sorted: Vec<u64> = scored.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let mid = n / 2;
    let median = if n % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    };
    Ok(median)
}

/// Arithmetic mean; the per-decoder "combined" column.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
