//! Sample recorders: JSON-lines file output, or a sink when recording is off.

use reach_traits::Recorder;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Appends one JSON object per recorded tick to a file.
pub struct JsonlRecorder {
    writer: BufWriter<File>,
}

impl JsonlRecorder {
    pub fn create(path: &Path) -> Result<Self, DynError> {
        let file =
            File::create(path).map_err(|e| format!("creating {}: {e}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Recorder for JsonlRecorder {
    fn record(
        &mut self,
        timestamp_ms: u64,
        trial_index: usize,
        position: &[f32],
        target: &[f32],
        online: bool,
    ) -> Result<(), DynError> {
        let line = json!({
            "t_ms": timestamp_ms,
            "trial": trial_index,
            "position": position,
            "target": target,
            "online": online,
        });
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DynError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Recorder used when recording is disabled; accepts and discards samples.
#[derive(Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(
        &mut self,
        _timestamp_ms: u64,
        _trial_index: usize,
        _position: &[f32],
        _target: &[f32],
        _online: bool,
    ) -> Result<(), DynError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DynError> {
        Ok(())
    }
}
