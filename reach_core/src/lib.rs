#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Closed-loop target-acquisition benchmarking (collaborator-agnostic).
//!
//! This crate provides the trial control loop and sweep orchestration. All
//! external collaborators (tracker, decoder, recorder, presenter) go through
//! `reach_traits` contracts.
//!
//! ## Architecture
//!
//! - **Pacing**: fixed-rate frame pacer with monotonic elapsed time (`pacer`)
//! - **Targets**: random / center-out generation with DOF-to-channel
//!   expansion and per-channel floors (`target`)
//! - **Position**: passthrough vs. decoded mode with a bounded diagnostic
//!   trace cache (`source`)
//! - **Trials**: dwell/timeout state machine with auto re-arm (`trial`)
//! - **Orchestration**: per-condition loop (`runner`) and sweep grid with
//!   summary statistics (`sweep`)

// Module declarations
pub mod conversions;
pub mod error;
pub mod mocks;
pub mod pacer;
pub mod runner;
pub mod source;
pub mod sweep;
pub mod target;
pub mod trial;
pub mod util;

pub use error::TaskError;
pub use pacer::FramePacer;
pub use runner::RunParams;
pub use source::PositionSource;
pub use sweep::{GROUND_TRUTH, SweepParams, SweepReport, SweepRow, SweepTable, run_sweep};
pub use target::{TargetCfg, TargetGenerator, TargetStyle, dof_channel_map};
pub use trial::{TrialCfg, TrialRun, TrialStatus};
