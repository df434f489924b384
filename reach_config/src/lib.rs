#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the target-acquisition benchmark.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Validation happens before any trial loop starts: a bad DOF count,
//!   target style, frame rate or trial count aborts the whole sweep.
use serde::Deserialize;

/// Target-generation style for a condition.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Random,
    Centerout,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Random => "random",
            Style::Centerout => "centerout",
        }
    }
}

/// Per-trial acquisition parameters.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TaskCfg {
    /// Effector channel count (e.g. 5 for a five-finger hand).
    pub channels: usize,
    /// Max-norm containment tolerance around the target.
    pub size: f32,
    /// Continuous dwell required inside the tolerance band (ms).
    pub hold_ms: u64,
    /// Forced-advance timeout per trial (ms).
    pub timeout_ms: u64,
    /// Margin keeping targets away from the range boundary.
    pub edge: f32,
}

impl Default for TaskCfg {
    fn default() -> Self {
        Self {
            channels: 5,
            size: 0.15,
            hold_ms: 500,
            timeout_ms: 20_000,
            edge: 0.05,
        }
    }
}

/// Sweep condition grid and scoring parameters.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SweepCfg {
    /// Decoder identifiers; "GT" denotes the ground-truth (passthrough) row.
    pub decoders: Vec<String>,
    pub styles: Vec<Style>,
    /// Logical degrees of freedom to evaluate; each must be 1, 2 or 3.
    pub dofs: Vec<u8>,
    /// Trials per condition, including the discarded first trial.
    pub trials: usize,
    /// Base RNG seed for reproducible target sequences.
    pub seed: Option<u64>,
}

impl Default for SweepCfg {
    fn default() -> Self {
        Self {
            decoders: vec!["GT".into()],
            styles: vec![Style::Random, Style::Centerout],
            dofs: vec![1],
            trials: 8,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PacingCfg {
    /// Target update rate for the trial loop.
    pub frame_rate_hz: u32,
}

impl Default for PacingCfg {
    fn default() -> Self {
        Self { frame_rate_hz: 30 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DecodersCfg {
    /// Directory holding decoder artifacts, keyed by name.
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RecordingCfg {
    pub enabled: bool,
    /// Output path for recorded samples (JSON lines).
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub task: TaskCfg,
    pub sweep: SweepCfg,
    pub pacing: PacingCfg,
    pub decoders: DecodersCfg,
    pub recording: RecordingCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Task
        if self.task.channels == 0 {
            eyre::bail!("task.channels must be >= 1");
        }
        if !self.task.size.is_finite() || self.task.size <= 0.0 {
            eyre::bail!("task.size must be > 0");
        }
        if self.task.size >= 0.5 {
            eyre::bail!("task.size must be < 0.5 (half the normalized range)");
        }
        if self.task.hold_ms == 0 {
            eyre::bail!("task.hold_ms must be >= 1");
        }
        if self.task.timeout_ms <= self.task.hold_ms {
            eyre::bail!("task.timeout_ms must exceed task.hold_ms");
        }
        if !self.task.edge.is_finite() || self.task.edge < 0.0 || self.task.edge >= 0.5 {
            eyre::bail!("task.edge must be in [0.0, 0.5)");
        }

        // Sweep
        if self.sweep.decoders.is_empty() {
            eyre::bail!("sweep.decoders must name at least one decoder (or \"GT\")");
        }
        if self.sweep.styles.is_empty() {
            eyre::bail!("sweep.styles must contain at least one style");
        }
        if self.sweep.dofs.is_empty() {
            eyre::bail!("sweep.dofs must contain at least one DOF count");
        }
        for dof in &self.sweep.dofs {
            if !(1..=3).contains(dof) {
                eyre::bail!("sweep.dofs entries must be 1, 2 or 3 (got {dof})");
            }
            if usize::from(*dof) > self.task.channels {
                eyre::bail!("sweep.dofs entry {dof} exceeds task.channels");
            }
        }
        // A single trial would leave nothing to score once the first is discarded.
        if self.sweep.trials < 2 {
            eyre::bail!("sweep.trials must be >= 2 (first trial is discarded from scoring)");
        }

        // Pacing
        if self.pacing.frame_rate_hz == 0 {
            eyre::bail!("pacing.frame_rate_hz must be > 0");
        }
        if self.pacing.frame_rate_hz > 1000 {
            eyre::bail!("pacing.frame_rate_hz is unreasonably high (>1000)");
        }

        // Recording
        if self.recording.enabled && self.recording.file.is_none() {
            eyre::bail!("recording.file must be set when recording.enabled = true");
        }

        Ok(())
    }
}
