//! Replay command - run a JSON move script

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use morris_core::{render_ascii, Replay, Script};

#[derive(Args)]
pub struct ReplayArgs {
    /// Move script JSON file (object with "moves", or a bare array of point ids)
    #[arg(long, value_name = "FILE")]
    pub moves: PathBuf,

    /// Output the replay as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let script = Script::load(&args.moves)
        .with_context(|| format!("Failed to load script: {}", args.moves.display()))?;

    tracing::info!(
        "Replaying {} ({} moves)",
        script.name.as_deref().unwrap_or("unnamed"),
        script.moves.len()
    );

    let replay = script
        .replay()
        .with_context(|| format!("Replay of {} stopped", args.moves.display()))?;

    for step in &replay.steps {
        for event in &step.events {
            tracing::debug!("point {}: {}", step.point, event);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&replay)?);
    } else {
        print!("{}", format_replay(&replay));
    }

    Ok(())
}

fn format_replay(replay: &Replay) -> String {
    let mut text = String::new();

    for (i, step) in replay.steps.iter().enumerate() {
        if step.events.is_empty() {
            text.push_str(&format!("#{:<3} {:>2}\n", i + 1, step.point));
            continue;
        }
        let events: Vec<String> = step.events.iter().map(|e| e.to_string()).collect();
        text.push_str(&format!("#{:<3} {:>2}  {}\n", i + 1, step.point, events.join("; ")));
    }

    let state = &replay.final_state;
    text.push('\n');
    text.push_str(&render_ascii(state.board()));
    text.push('\n');
    text.push_str(&format!(
        "phase: {:?}, to move: {}, result: {:?}\n",
        state.phase(),
        state.current_player(),
        state.result()
    ));
    text
}
