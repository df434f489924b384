//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "reachbench", version, about = "Closed-loop reach benchmark CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/reachbench.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty; results are printed as JSON too
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Target style selectable from the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStyle {
    Random,
    Centerout,
}

impl From<CliStyle> for reach_core::TargetStyle {
    fn from(s: CliStyle) -> Self {
        match s {
            CliStyle::Random => reach_core::TargetStyle::Random,
            CliStyle::Centerout => reach_core::TargetStyle::CenterOut,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full decoder x style x DOF condition grid from the config
    Sweep {
        /// Override trials per condition (takes precedence over config)
        #[arg(long, value_name = "N")]
        trials: Option<usize>,
        /// Override the base RNG seed for reproducible target sequences
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// Restrict the sweep to these decoders (repeatable; "GT" = passthrough)
        #[arg(long = "decoder", value_name = "NAME")]
        decoders: Vec<String>,
        /// Write the results table as JSON to this file as well
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Run a single condition and print its one-row results table
    Trial {
        /// Decoder to drive the effector with ("GT" = passthrough)
        #[arg(long, default_value = "GT")]
        decoder: String,
        /// Target style for the condition
        #[arg(long, value_enum, default_value = "random")]
        style: CliStyle,
        /// Logical degrees of freedom (1..=3)
        #[arg(long, default_value_t = 1)]
        dof: u8,
        /// Override trials for this condition
        #[arg(long, value_name = "N")]
        trials: Option<usize>,
        /// Override the RNG seed
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },
    /// Validate the config and check that decoder artifacts are loadable
    SelfCheck,
}
