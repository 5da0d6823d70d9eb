use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cube_snake::game::GameConfig;
use cube_snake::modes::{HeadlessMode, HeadlessOptions, HumanMode};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cube_snake")]
#[command(version, about = "3D Snake on an 8x8x8 voxel cube")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for apple placement and the random stick
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between steps
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Snake length that wins the game
    #[arg(long)]
    win_length: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Steer with the keyboard in the terminal
    Human,
    /// Run unattended, streaming framed snapshots
    Headless {
        /// Frame destination (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Send bare 64-byte frames without the marker byte
        #[arg(long)]
        no_marker: bool,

        /// Steering script of L/R/U/D/F characters, replayed in a loop
        #[arg(long)]
        script: Option<String>,

        /// Stop after this many iterations
        #[arg(long)]
        max_steps: Option<u64>,
    },
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match (&cli.log_file, &cli.mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Logging to stderr would scribble over the TUI
        (None, Mode::Human) => {}
        (None, Mode::Headless { .. }) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(win_length) = cli.win_length {
        config.win_length = win_length;
    }
    if let Mode::Headless { no_marker: true, .. } = cli.mode {
        config.frame_marker = None;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Headless {
            output,
            script,
            max_steps,
            ..
        } => {
            let options = HeadlessOptions {
                output,
                script,
                max_steps,
            };
            // Blocking loop; keep it off the async workers
            let summary =
                tokio::task::spawn_blocking(move || HeadlessMode::new(config, options).run())
                    .await
                    .context("Headless run panicked")??;

            eprintln!(
                "{:?} after {} iterations ({} frames, {} apples)",
                summary.phase, summary.iterations, summary.frames, summary.score
            );
        }
    }

    Ok(())
}
