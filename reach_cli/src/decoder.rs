//! File-backed decoder bank and the integration-beta smoothing decoder.
//!
//! Artifacts live in the configured bank directory as `<name>.json`, e.g.
//! `{"integration_beta": 0.2}`. The decoder integrates each raw reading into
//! its running estimate: `state = beta * raw + (1 - beta) * state`.

use reach_traits::{Decoder, DecoderBank};
use std::path::PathBuf;

type DynError = Box<dyn std::error::Error + Send + Sync>;

pub struct SmoothingDecoder {
    beta: f32,
    state: Vec<f32>,
}

impl SmoothingDecoder {
    pub fn new(beta: f32) -> Self {
        Self {
            beta,
            state: Vec::new(),
        }
    }
}

impl Decoder for SmoothingDecoder {
    fn decode(&mut self, raw: &[f32]) -> Result<Vec<f32>, DynError> {
        if self.state.len() != raw.len() {
            // Unseeded (or channel count changed): start from the reading.
            self.state = raw.to_vec();
        } else {
            for (s, r) in self.state.iter_mut().zip(raw) {
                *s = self.beta * r + (1.0 - self.beta) * *s;
            }
        }
        Ok(self.state.clone())
    }

    fn set_initial_position(&mut self, position: &[f32]) {
        self.state = position.to_vec();
    }

    fn recent_trace(&self) -> Vec<f32> {
        self.state.clone()
    }
}

/// Loads decoder artifacts by name from an on-disk directory.
pub struct FileDecoderBank {
    dir: Option<PathBuf>,
}

impl FileDecoderBank {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn artifact_path(&self, name: &str) -> Result<PathBuf, DynError> {
        let dir = self
            .dir
            .as_ref()
            .ok_or("decoders.dir is not configured")?;
        Ok(dir.join(format!("{name}.json")))
    }
}

impl DecoderBank for FileDecoderBank {
    fn load(&mut self, name: &str) -> Result<Box<dyn Decoder>, DynError> {
        let path = self.artifact_path(name)?;
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("reading {}: {e}", path.display()))?;
        let artifact: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("parsing {}: {e}", path.display()))?;
        let beta = artifact
            .get("integration_beta")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| format!("{}: missing integration_beta", path.display()))?;
        if !(0.0..=1.0).contains(&beta) {
            return Err(format!("{}: integration_beta must be in [0, 1]", path.display()).into());
        }
        tracing::info!(decoder = %name, beta, "decoder artifact loaded");
        Ok(Box::new(SmoothingDecoder::new(beta as f32)))
    }
}
