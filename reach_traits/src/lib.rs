pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Sensor collaborator yielding the effector's raw position each tick.
///
/// A reading is a fixed-length channel vector (one value per effector
/// channel). A momentary "no reading available" condition is reported as an
/// error; callers treat it as transient and retry on the next tick.
pub trait Tracker {
    fn current_position(
        &mut self,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Stateful decoding model mapping a raw position to a refined estimate.
///
/// The decoder's internal architecture is opaque to the control loop; the
/// only contract beyond `decode` is seeding its internal estimate on mode
/// toggle and exposing a diagnostic trace for visualization.
pub trait Decoder {
    fn decode(
        &mut self,
        raw: &[f32],
    ) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;

    /// Seed the internal position estimate; called once when the position
    /// source switches from passthrough to decoded mode.
    fn set_initial_position(&mut self, position: &[f32]);

    /// Most recent internal input/output trace, for visualization only.
    fn recent_trace(&self) -> Vec<f32>;
}

/// Named store of trained decoder artifacts.
pub trait DecoderBank {
    fn load(
        &mut self,
        name: &str,
    ) -> Result<Box<dyn Decoder>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Sink for per-tick samples while a recording flag is active.
pub trait Recorder {
    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        timestamp_ms: u64,
        trial_index: usize,
        position: &[f32],
        target: &[f32],
        online: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Finalize the recording (e.g. flush buffered samples to disk).
    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Observational sink for live per-tick status text. Never read back by the
/// control loop.
pub trait Presenter {
    fn live(&mut self, text: &str);
}
