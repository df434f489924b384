//! Target generation for acquisition trials.
//!
//! A small number of logical degrees of freedom drives a wider effector
//! channel vector: the DOF values are drawn first, expanded through a fixed
//! DOF-to-channel table, clamped to per-channel floors and rounded. Floors
//! keep generated poses physically plausible (a fully closed first channel
//! is unreachable on the real effector).

use crate::error::TaskError;
use crate::util::{linspace, round2};
use rand::Rng;

/// Number of evenly spaced points available to the center-out style.
const DISCRETE_POINTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStyle {
    /// Each DOF drawn uniformly from the configured range.
    Random,
    /// Alternate between the range midpoint and discrete peripheral poses.
    CenterOut,
}

impl TargetStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStyle::Random => "random",
            TargetStyle::CenterOut => "centerout",
        }
    }
}

/// Generator configuration, fixed for the lifetime of one condition run.
#[derive(Debug, Clone)]
pub struct TargetCfg {
    /// Logical degrees of freedom (1..=3).
    pub dof: u8,
    pub style: TargetStyle,
    /// Inclusive draw range, already narrowed by the edge margin.
    pub range: (f32, f32),
    /// Effector channel count.
    pub channels: usize,
    /// Per-channel minimum clamps, applied after expansion.
    pub floors: Vec<(usize, f32)>,
}

impl TargetCfg {
    /// Range `[edge, 1 - edge]` with the stock hand floors (channel 0 at
    /// 0.3, last channel at 0.1).
    pub fn hand(dof: u8, style: TargetStyle, channels: usize, edge: f32) -> Self {
        Self {
            dof,
            style,
            range: (edge, 1.0 - edge),
            channels,
            floors: vec![(0, 0.3), (channels.saturating_sub(1), 0.1)],
        }
    }
}

/// Map a DOF count to the channel index each logical value drives.
///
/// DOF values outside {1,2,3} are a configuration error, never a fallback.
pub fn dof_channel_map(dof: u8, channels: usize) -> Result<Vec<usize>, TaskError> {
    let map = match dof {
        1 => vec![0; channels],
        2 => {
            let mut m = vec![1; channels];
            m[0] = 0;
            m
        }
        3 => {
            let mut m = vec![2; channels];
            m[0] = 0;
            m[1] = 1;
            m
        }
        other => {
            return Err(TaskError::Config(format!(
                "invalid target dof: {other} (expected 1, 2 or 3)"
            )));
        }
    };
    Ok(map)
}

pub struct TargetGenerator<R: Rng> {
    cfg: TargetCfg,
    rng: R,
    /// Channel index driven by each physical channel's logical DOF.
    channel_map: Vec<usize>,
    /// Precomputed discrete draw points for the center-out style.
    discrete: Vec<f32>,
    at_center: bool,
}

impl<R: Rng> TargetGenerator<R> {
    pub fn new(cfg: TargetCfg, rng: R) -> Result<Self, TaskError> {
        if cfg.channels == 0 {
            return Err(TaskError::Config("channel count must be >= 1".into()));
        }
        if usize::from(cfg.dof) > cfg.channels {
            return Err(TaskError::Config(format!(
                "dof {} exceeds channel count {}",
                cfg.dof, cfg.channels
            )));
        }
        if !(cfg.range.0.is_finite() && cfg.range.1.is_finite()) || cfg.range.0 >= cfg.range.1 {
            return Err(TaskError::Config(format!(
                "invalid target range [{}, {}]",
                cfg.range.0, cfg.range.1
            )));
        }
        let channel_map = dof_channel_map(cfg.dof, cfg.channels)?;
        let discrete = linspace(cfg.range.0, cfg.range.1, DISCRETE_POINTS);
        Ok(Self {
            cfg,
            rng,
            channel_map,
            discrete,
            // Forces a centering phase before the first outward target.
            at_center: false,
        })
    }

    pub fn style(&self) -> TargetStyle {
        self.cfg.style
    }

    /// Generate the next target, one full channel vector per call.
    pub fn next_target(&mut self) -> Vec<f32> {
        let dof_values = match self.cfg.style {
            TargetStyle::Random => self.draw_uniform(),
            TargetStyle::CenterOut => {
                if self.at_center {
                    self.at_center = false;
                    self.draw_discrete()
                } else {
                    self.at_center = true;
                    let mid = (self.cfg.range.0 + self.cfg.range.1) / 2.0;
                    vec![mid; usize::from(self.cfg.dof)]
                }
            }
        };
        self.expand(&dof_values)
    }

    fn draw_uniform(&mut self) -> Vec<f32> {
        let (lo, hi) = self.cfg.range;
        (0..self.cfg.dof)
            .map(|_| self.rng.random_range(lo..=hi))
            .collect()
    }

    fn draw_discrete(&mut self) -> Vec<f32> {
        (0..self.cfg.dof)
            .map(|_| {
                let i = self.rng.random_range(0..self.discrete.len());
                self.discrete[i]
            })
            .collect()
    }

    /// Expand logical DOF values to the channel vector, then clamp floors
    /// and round to two decimals.
    fn expand(&self, dof_values: &[f32]) -> Vec<f32> {
        let mut target: Vec<f32> = self
            .channel_map
            .iter()
            .map(|&i| dof_values[i])
            .collect();
        for &(ch, floor) in &self.cfg.floors {
            if let Some(v) = target.get_mut(ch) {
                *v = v.max(floor);
            }
        }
        for v in &mut target {
            *v = round2(*v);
        }
        target
    }
}

impl<R: Rng> core::fmt::Debug for TargetGenerator<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TargetGenerator")
            .field("style", &self.cfg.style.as_str())
            .field("dof", &self.cfg.dof)
            .field("at_center", &self.at_center)
            .finish()
    }
}
