//! Process bootstrap: argument parsing, logging, signal handling, and
//! assembly of the collaborators the core trial loop runs against.

mod cli;
mod decoder;
mod error_fmt;
mod recorder;
mod report;
mod tracker;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::decoder::FileDecoderBank;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::recorder::{JsonlRecorder, NullRecorder};
use crate::report::StderrPresenter;
use crate::tracker::SimTracker;
use clap::Parser;
use eyre::{Result, WrapErr};
use reach_core::sweep::{SweepParams, run_sweep};
use reach_traits::Recorder;
use reach_traits::clock::MonotonicClock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "etc/reachbench.toml";

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    if let Err(err) = run(&cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    cfg.validate()?;
    init_logging(cli, &cfg.logging);

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .wrap_err("installing Ctrl-C handler")?;
    }

    match &cli.cmd {
        Commands::Sweep {
            trials,
            seed,
            decoders,
            out,
        } => {
            let mut params = SweepParams::from(&cfg);
            if let Some(t) = trials {
                params.trial.trials = *t;
            }
            if let Some(s) = seed {
                params.seed = Some(*s);
            }
            if !decoders.is_empty() {
                params.decoders = decoders.clone();
            }
            run_and_print(&cfg, params, out.as_deref(), cli.json, &cancel)
        }
        Commands::Trial {
            decoder,
            style,
            dof,
            trials,
            seed,
        } => {
            let mut params = SweepParams::from(&cfg);
            params.decoders = vec![decoder.clone()];
            params.styles = vec![(*style).into()];
            params.dofs = vec![*dof];
            if let Some(t) = trials {
                params.trial.trials = *t;
            }
            if let Some(s) = seed {
                params.seed = Some(*s);
            }
            run_and_print(&cfg, params, None, cli.json, &cancel)
        }
        Commands::SelfCheck => self_check(&cfg, cli.json),
    }
}

/// Missing config at the default path falls back to built-in defaults; a
/// missing explicitly-given path is an error.
fn load_config(path: &Path) -> Result<reach_config::Config> {
    if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        return reach_config::load_toml(&text)
            .wrap_err_with(|| format!("parsing config {}", path.display()));
    }
    if path == Path::new(DEFAULT_CONFIG) {
        return Ok(reach_config::Config::default());
    }
    eyre::bail!("config file not found: {}", path.display());
}

fn init_logging(cli: &Cli, logging: &reach_config::Logging) {
    // RUST_LOG wins, then the CLI flag, then [logging] in the config.
    let level = if cli.log_level == "info" {
        logging.level.clone().unwrap_or_else(|| cli.log_level.clone())
    } else {
        cli.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(file) = &logging.file {
        let path = Path::new(file);
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .map_or_else(|| "reachbench.log".into(), |n| n.to_string_lossy().into_owned());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
    } else if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_and_print(
    cfg: &reach_config::Config,
    params: SweepParams,
    out: Option<&Path>,
    json: bool,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut tracker = SimTracker::new(cfg.task.channels, params.seed);
    let mut bank = FileDecoderBank::new(cfg.decoders.dir.as_ref().map(PathBuf::from));
    let mut recorder: Box<dyn Recorder> = if cfg.recording.enabled {
        let path = cfg
            .recording
            .file
            .as_ref()
            .ok_or_else(|| eyre::eyre!("recording.file must be set when recording is enabled"))?;
        Box::new(JsonlRecorder::create(Path::new(path)).map_err(|e| eyre::eyre!("{e}"))?)
    } else {
        Box::new(NullRecorder)
    };
    let mut presenter = StderrPresenter;

    let result = run_sweep(
        &params,
        &mut tracker,
        &mut bank,
        &mut *recorder,
        &mut presenter,
        Arc::new(MonotonicClock::new()),
        cancel,
    );
    eprintln!(); // end the live status line
    let report = result?;

    if json {
        println!("{}", report::to_json(&report));
    } else {
        println!("{}", report::render_text(&report));
    }
    if let Some(out) = out {
        let pretty = serde_json::to_string_pretty(&report::to_json(&report))
            .wrap_err("serializing results")?;
        std::fs::write(out, pretty)
            .wrap_err_with(|| format!("writing results to {}", out.display()))?;
        tracing::info!(path = %out.display(), "results written");
    }
    Ok(())
}

/// Validate the config and prove every configured decoder artifact loads.
fn self_check(cfg: &reach_config::Config, json: bool) -> Result<()> {
    use reach_traits::DecoderBank;

    let mut bank = FileDecoderBank::new(cfg.decoders.dir.as_ref().map(PathBuf::from));
    let mut loaded = 0usize;
    for name in &cfg.sweep.decoders {
        if name == reach_core::GROUND_TRUTH {
            continue;
        }
        bank.load(name).map_err(|e| {
            eyre::Report::new(reach_core::TaskError::DecoderLoad {
                name: name.clone(),
                reason: e.to_string(),
            })
        })?;
        loaded += 1;
    }

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "decoders_loaded": loaded })
        );
    } else {
        println!("self-check ok ({loaded} decoder artifacts loadable)");
    }
    Ok(())
}
