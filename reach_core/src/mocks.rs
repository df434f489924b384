//! Test and helper doubles for reach_core.

use reach_traits::{Decoder, DecoderBank, Presenter, Recorder, Tracker};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Tracker that replays a fixed sequence of readings, then holds the last.
pub struct ScriptedTracker {
    seq: Vec<Vec<f32>>,
    idx: usize,
}

impl ScriptedTracker {
    pub fn new(seq: impl Into<Vec<Vec<f32>>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
        }
    }

    /// Tracker that returns the same reading forever.
    pub fn constant(position: Vec<f32>) -> Self {
        Self::new(vec![position])
    }
}

impl Tracker for ScriptedTracker {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx].clone();
            self.idx += 1;
            x
        } else {
            self.seq
                .last()
                .cloned()
                .ok_or_else(|| std::io::Error::other("scripted tracker is empty"))?
        };
        Ok(v)
    }
}

/// Tracker that always reports "no reading available".
pub struct LostTracker;

impl Tracker for LostTracker {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("tracking lost")))
    }
}

/// Tracker that drops every other reading, counting attempted reads.
pub struct FlakyTracker<T> {
    inner: T,
    reads: usize,
}

impl<T: Tracker> FlakyTracker<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, reads: 0 }
    }

    /// Total reads attempted, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl<T: Tracker> Tracker for FlakyTracker<T> {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.reads += 1;
        if self.reads % 2 == 1 {
            return Err(Box::new(std::io::Error::other("tracking lost")));
        }
        self.inner.current_position()
    }
}

/// Tracker reading whatever target the run last published through its
/// recorder; lags the true target by one tick. Paired with
/// [`MemoryRecorder`] for closed-loop tests where the "hand" snaps onto the
/// target.
pub struct SharedTargetTracker {
    shared: Arc<Mutex<Vec<f32>>>,
}

impl SharedTargetTracker {
    pub fn new(initial: Vec<f32>) -> (Self, Arc<Mutex<Vec<f32>>>) {
        let shared = Arc::new(Mutex::new(initial));
        (
            Self {
                shared: shared.clone(),
            },
            shared,
        )
    }
}

impl Tracker for SharedTargetTracker {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let guard = self
            .shared
            .lock()
            .map_err(|_| std::io::Error::other("shared target poisoned"))?;
        Ok(guard.clone())
    }
}

/// Decoder that returns the raw position unchanged and counts seedings.
#[derive(Default)]
pub struct EchoDecoder {
    seeded: Arc<AtomicUsize>,
    last: Vec<f32>,
}

impl EchoDecoder {
    pub fn seed_counter(&self) -> Arc<AtomicUsize> {
        self.seeded.clone()
    }
}

impl Decoder for EchoDecoder {
    fn decode(
        &mut self,
        raw: &[f32],
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
        self.last = raw.to_vec();
        Ok(raw.to_vec())
    }

    fn set_initial_position(&mut self, position: &[f32]) {
        self.seeded.fetch_add(1, Ordering::Relaxed);
        self.last = position.to_vec();
    }

    fn recent_trace(&self) -> Vec<f32> {
        self.last.clone()
    }
}

/// Recorder that keeps samples in memory and optionally mirrors each target
/// into a shared cell (the other half of [`SharedTargetTracker`]).
#[derive(Default)]
pub struct MemoryRecorder {
    pub samples: Vec<RecordedSample>,
    pub flushed: usize,
    mirror: Option<Arc<Mutex<Vec<f32>>>>,
}

#[derive(Debug, Clone)]
pub struct RecordedSample {
    pub timestamp_ms: u64,
    pub trial_index: usize,
    pub position: Vec<f32>,
    pub target: Vec<f32>,
    pub online: bool,
}

impl MemoryRecorder {
    pub fn mirroring(shared: Arc<Mutex<Vec<f32>>>) -> Self {
        Self {
            mirror: Some(shared),
            ..Self::default()
        }
    }
}

impl Recorder for MemoryRecorder {
    fn record(
        &mut self,
        timestamp_ms: u64,
        trial_index: usize,
        position: &[f32],
        target: &[f32],
        online: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(mirror) = &self.mirror {
            let mut guard = mirror
                .lock()
                .map_err(|_| std::io::Error::other("mirror poisoned"))?;
            *guard = target.to_vec();
        }
        self.samples.push(RecordedSample {
            timestamp_ms,
            trial_index,
            position: position.to_vec(),
            target: target.to_vec(),
            online,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.flushed += 1;
        Ok(())
    }
}

/// Presenter that discards live text.
#[derive(Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn live(&mut self, _text: &str) {}
}

/// Bank handing out a fresh [`EchoDecoder`] for any name.
#[derive(Default)]
pub struct EchoBank {
    pub loads: usize,
}

impl DecoderBank for EchoBank {
    fn load(
        &mut self,
        _name: &str,
    ) -> Result<Box<dyn Decoder>, Box<dyn std::error::Error + Send + Sync>> {
        self.loads += 1;
        Ok(Box::new(EchoDecoder::default()))
    }
}

/// Bank whose artifacts are always missing.
#[derive(Default)]
pub struct MissingBank;

impl DecoderBank for MissingBank {
    fn load(
        &mut self,
        name: &str,
    ) -> Result<Box<dyn Decoder>, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no artifact named '{name}'"),
        )))
    }
}
