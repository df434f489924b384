//! `From` implementations bridging `reach_config` types to `reach_core` types.
//!
//! These eliminate manual field-by-field mapping in the CLI.

use crate::sweep::SweepParams;
use crate::target::TargetStyle;
use crate::trial::TrialCfg;

impl From<reach_config::Style> for TargetStyle {
    fn from(s: reach_config::Style) -> Self {
        match s {
            reach_config::Style::Random => TargetStyle::Random,
            reach_config::Style::Centerout => TargetStyle::CenterOut,
        }
    }
}

impl From<&reach_config::Config> for TrialCfg {
    fn from(c: &reach_config::Config) -> Self {
        Self {
            size: c.task.size,
            hold_ms: c.task.hold_ms,
            timeout_ms: c.task.timeout_ms,
            trials: c.sweep.trials,
            channels: c.task.channels,
        }
    }
}

impl From<&reach_config::Config> for SweepParams {
    fn from(c: &reach_config::Config) -> Self {
        Self {
            decoders: c.sweep.decoders.clone(),
            styles: c.sweep.styles.iter().map(|&s| s.into()).collect(),
            dofs: c.sweep.dofs.clone(),
            trial: c.into(),
            frame_rate_hz: c.pacing.frame_rate_hz,
            edge: c.task.edge,
            seed: c.sweep.seed,
            recording: c.recording.enabled,
        }
    }
}
