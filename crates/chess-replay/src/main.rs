//! Chess Replay - Plays a move list through the rules engine.
//!
//! Moves come from a TOML replay file and/or the command line. The final
//! position is printed as FEN, or the whole game as JSON with `--json`.

mod config;
mod replay;

use clap::Parser;
use config::ReplayConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chess Replay - Plays moves through the rules engine.
#[derive(Parser)]
#[command(name = "chess-replay")]
#[command(about = "Replays UCI moves and reports the resulting position")]
struct Args {
    /// Path to the replay file (a missing file means an empty replay)
    #[arg(long, default_value_os_t = ReplayConfig::default_path())]
    config: PathBuf,

    /// Starting position in FEN, overriding the replay file
    #[arg(long)]
    start: Option<String>,

    /// Print the final game as JSON instead of FEN
    #[arg(long)]
    json: bool,

    /// Keep playing after checkmate or stalemate
    #[arg(long)]
    no_stop: bool,

    /// Moves in UCI notation, played after those in the replay file
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut config = ReplayConfig::load(&args.config)?;
    tracing::info!("Replay file: {:?}", args.config);
    if args.start.is_some() {
        config.start = args.start;
    }
    config.moves.extend(args.moves);
    if args.no_stop {
        config.stop_on_end = false;
    }
    tracing::info!("Replaying {} moves", config.moves.len());

    let summary = replay::replay(&config)?;
    tracing::info!(
        "Played {}, skipped {}: {}",
        summary.played,
        summary.skipped,
        summary.status
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.fen);
    }
    Ok(())
}
