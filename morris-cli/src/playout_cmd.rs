//! Random command - uniformly random games over legal clicks
//!
//! ## Architecture
//!
//! - run(): orchestration
//! - play_games(), report_results()
//! - compute_statistics() and formatting utilities

use anyhow::Result;
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use morris_core::{random_playout, GameResult, GameState, PlayoutRecord};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct RandomArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Clicks per game before it counts as unfinished
    #[arg(long, default_value = "1000")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated playout results
#[derive(Clone, Debug, PartialEq)]
struct PlayoutStats {
    games: usize,
    x_wins: usize,
    o_wins: usize,
    unfinished: usize,
    avg_plies: f32,
    total_mills: usize,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: RandomArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting random playouts: {} games, max {} plies, seed={:?}",
        args.games,
        args.max_plies,
        seed
    );

    let records = play_games(&args, seed);
    let stats = compute_statistics(&records);

    report_results(&stats, &args)
}

fn play_games(args: &RandomArgs, seed: Option<u64>) -> Vec<PlayoutRecord> {
    let mut rng = create_rng(seed);
    let mut records = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let record = random_playout(GameState::new(), &mut rng, args.max_plies);
        tracing::debug!(
            "Game {}: {:?} after {} plies, {} mills",
            game_num + 1,
            record.result,
            record.plies,
            record.mills
        );
        records.push(record);
    }

    records
}

fn report_results(stats: &PlayoutStats, args: &RandomArgs) -> Result<()> {
    if args.json {
        print_json_results(stats)
    } else {
        print_text_results(stats);
        Ok(())
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn compute_statistics(records: &[PlayoutRecord]) -> PlayoutStats {
    let count = |result: GameResult| records.iter().filter(|r| r.result == result).count();

    let total_plies: usize = records.iter().map(|r| r.plies).sum();
    let avg_plies = if records.is_empty() {
        0.0
    } else {
        total_plies as f32 / records.len() as f32
    };

    PlayoutStats {
        games: records.len(),
        x_wins: count(GameResult::XWins),
        o_wins: count(GameResult::OWins),
        unfinished: count(GameResult::Ongoing),
        avg_plies,
        total_mills: records.iter().map(|r| r.mills).sum(),
    }
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(stats: &PlayoutStats) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        unfinished: usize,
        avg_plies: f32,
        total_mills: usize,
        x_win_rate: f32,
    }

    let output = JsonOutput {
        total_games: stats.games,
        x_wins: stats.x_wins,
        o_wins: stats.o_wins,
        unfinished: stats.unfinished,
        avg_plies: stats.avg_plies,
        total_mills: stats.total_mills,
        x_win_rate: percent(stats.x_wins, stats.games) / 100.0,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(stats: &PlayoutStats) {
    println!("\n=== Random Playouts ===");
    println!("Total games: {}", stats.games);
    println!("X wins:      {} ({:.1}%)", stats.x_wins, percent(stats.x_wins, stats.games));
    println!("O wins:      {} ({:.1}%)", stats.o_wins, percent(stats.o_wins, stats.games));
    println!(
        "Unfinished:  {} ({:.1}%)",
        stats.unfinished,
        percent(stats.unfinished, stats.games)
    );
    println!("Avg plies:   {:.1}", stats.avg_plies);
    println!("Mills:       {}", stats.total_mills);
}

// ============================================================================
// TESTS
// ============================================================================
