//! Morris CLI - Command-line interface
//!
//! Commands:
//! - play: interactive game, one point id per line on stdin
//! - replay: run a JSON move script and report every event
//! - random: random playouts with summary statistics

mod play;
mod playout_cmd;
mod replay;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morris")]
#[command(about = "Nine Men's Morris rule engine")]
struct Cli {
    /// Seed for random playouts (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play(play::PlayArgs),
    /// Replay a move script
    Replay(replay::ReplayArgs),
    /// Run random playouts
    Random(playout_cmd::RandomArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Replay(args) => replay::run(args),
        Commands::Random(args) => playout_cmd::run(args, cli.seed),
    }
}

/// Logs go to stderr so JSON output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
