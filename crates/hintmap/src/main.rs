//! Command-line entrypoint for hintmap.
//!
//! The platform hook, scanner and overlay live outside this workspace; this
//! binary checks configurations, prints label sets, and replays scripted key
//! sequences through the engine with headless collaborators.
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use config::Config;
use crossbeam_channel::bounded;
use hintmap_engine::{ElementHandle, Engine};
use logging::{self as logshared, forward};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*};

/// Headless engine collaborators.
mod collab;
/// Replay script parsing and execution.
mod replay;

use crate::collab::Transcript;

#[derive(Parser, Debug)]
#[command(name = "hintmap", about = "Keyboard hint-mode engine", version)]
/// Command-line interface for the `hintmap` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the configuration then exit.
    Check {
        /// Path to configuration file to check (defaults to ~/.hintmap/config.ron)
        path: Option<PathBuf>,

        /// Dump the effective configuration as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
    /// Print the labels the configured alphabet assigns to COUNT targets.
    Labels {
        /// Number of targets
        count: usize,
    },
    /// Feed a key script through the engine and print every decision.
    Replay {
        /// Script file, one key event per line
        script: PathBuf,

        /// Number of elements the fake foreground window reports
        #[arg(long, default_value_t = 12)]
        targets: usize,

        /// Element handles whose activation fails as stale
        #[arg(long, value_name = "HANDLE", value_delimiter = ',')]
        stale: Vec<u64>,
    },
}

/// Print an error and exit with status 1.
fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

/// Load the effective config or exit with a readable error.
fn load_config(explicit: Option<&Path>) -> Config {
    match config::load(explicit) {
        Ok(cfg) => cfg,
        Err(e) => fail(&e.pretty()),
    }
}

/// `check`: validate and optionally dump.
fn check(explicit: Option<&Path>, dump: bool) {
    let cfg = load_config(explicit);
    if dump {
        match serde_json::to_string_pretty(&cfg) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&format!("Failed to serialize config: {e}")),
        }
    } else {
        println!("OK");
    }
}

/// `labels`: print one label per line.
fn labels(explicit: Option<&Path>, count: usize) {
    let cfg = load_config(explicit);
    let alphabet = match cfg.alphabet() {
        Ok(a) => a,
        Err(e) => fail(&e.pretty()),
    };
    let labels = alphabet.generate(count);
    if labels.len() < count {
        warn!(
            requested = count,
            capacity = alphabet.capacity(),
            "label_shortage"
        );
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, l) in labels.iter().enumerate() {
        if writeln!(out, "{i:>5} {l}").is_err() {
            return;
        }
    }
}

/// `replay`: run a script against an engine over headless collaborators.
fn replay_script(explicit: Option<&Path>, script: &Path, targets: usize, stale: &[u64]) {
    let cfg = load_config(explicit);
    let src = match fs::read_to_string(script) {
        Ok(s) => s,
        Err(e) => fail(&format!("Failed to read {}: {e}", script.display())),
    };
    let steps = match replay::parse_script(&src) {
        Ok(s) => s,
        Err(e) => fail(&format!("{}: {e}", script.display())),
    };

    let window = collab::synthetic_window(targets);
    if window.len() < targets {
        debug!(requested = targets, available = window.len(), "window_full");
    }
    let transcript = Transcript::default();
    let stale = stale.iter().copied().map(ElementHandle).collect();
    let services = collab::services(window, stale, &transcript);
    let engine = match Engine::new(&cfg, services) {
        Ok(e) => e,
        Err(e) => fail(&e.to_string()),
    };

    // Count warnings raised during the run through the forwarding layer.
    let (tx, rx) = bounded(1024);
    forward::set_sink(tx);
    let stdout = io::stdout();
    let result = replay::run(&engine, &transcript, &steps, &mut stdout.lock());
    forward::clear_sink();
    let summary = match result {
        Ok(s) => s,
        Err(e) => fail(&format!("Failed to write output: {e}")),
    };
    let warnings = rx.try_iter().filter(|r| r.level == "WARN").count();
    println!(
        "consumed={} passed={} ignored={} warnings={} mode={}",
        summary.consumed,
        summary.passed,
        summary.ignored,
        warnings,
        engine.mode()
    );
}

fn main() {
    let cli = Cli::parse();

    // Install a single subscriber combining:
    // - Env filter (from CLI or env)
    // - Compact fmt output on stderr (no time)
    // - Forward layer (no-op until a sink is set)
    tracing_subscriber::registry()
        .with(logshared::env_filter_from_spec(&cli.log.spec()))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .with(forward::layer())
        .try_init()
        .ok();

    let explicit = cli.config.as_deref();
    match &cli.command {
        Command::Check { path, dump } => check(path.as_deref().or(explicit), *dump),
        Command::Labels { count } => labels(explicit, *count),
        Command::Replay {
            script,
            targets,
            stale,
        } => replay_script(explicit, script, *targets, stale),
    }
}
