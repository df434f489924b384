//! Two-mode supplier of the effector's current position.
//!
//! Passthrough mode hands the raw tracker reading through unchanged; decoded
//! mode runs it through the condition's decoder and keeps a bounded window
//! of the decoder's diagnostic trace for visualization.

use crate::error::{Result, TaskError};
use eyre::WrapErr;
use reach_traits::Decoder;
use std::collections::VecDeque;

/// Sliding-window capacity for cached decoder traces.
const TRACE_WINDOW: usize = 100;

pub struct PositionSource {
    decoder: Option<Box<dyn Decoder>>,
    online: bool,
    traces: VecDeque<Vec<f32>>,
}

impl PositionSource {
    /// Ground-truth runs pass `None`; the source is then permanently
    /// passthrough and `set_online(true)` is rejected.
    pub fn new(decoder: Option<Box<dyn Decoder>>) -> Self {
        Self {
            decoder,
            online: false,
            traces: VecDeque::with_capacity(TRACE_WINDOW),
        }
    }

    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Switch between passthrough and decoded mode.
    ///
    /// Going online seeds the decoder's internal estimate with the current
    /// raw reading so the first decoded position does not jump.
    pub fn set_online(&mut self, online: bool, raw: &[f32]) -> Result<()> {
        if online {
            let decoder = self.decoder.as_mut().ok_or_else(|| {
                eyre::Report::new(TaskError::Config(
                    "cannot go online: no decoder configured for this run".into(),
                ))
            })?;
            if !self.online {
                decoder.set_initial_position(raw);
            }
        }
        self.online = online;
        Ok(())
    }

    /// Resolve the effector position for this tick from the raw reading.
    pub fn resolve(&mut self, raw: &[f32]) -> Result<Vec<f32>> {
        if !self.online {
            return Ok(raw.to_vec());
        }
        // online implies a decoder is present (set_online enforces it)
        let decoder = self.decoder.as_mut().ok_or_else(|| {
            eyre::Report::new(TaskError::Config("online without a decoder".into()))
        })?;
        let position = decoder
            .decode(raw)
            .map_err(|e| eyre::Report::new(TaskError::Input(e.to_string())))
            .wrap_err("decoding position")?;
        if self.traces.len() == TRACE_WINDOW {
            self.traces.pop_front();
        }
        self.traces.push_back(decoder.recent_trace());
        Ok(position)
    }

    /// Cached diagnostic traces, oldest first. Observational only.
    pub fn recent_traces(&self) -> impl Iterator<Item = &[f32]> {
        self.traces.iter().map(Vec::as_slice)
    }
}

impl core::fmt::Debug for PositionSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PositionSource")
            .field("online", &self.online)
            .field("has_decoder", &self.decoder.is_some())
            .field("cached_traces", &self.traces.len())
            .finish()
    }
}
