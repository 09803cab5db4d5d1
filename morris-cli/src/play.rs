//! Play command - interactive game on stdin
//!
//! Each input line is a point id, `reset`, or `quit`. Finished games are
//! reset automatically.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use morris_core::{render_ascii, Event, GameState, Phase, Player, Point, PIECES_PER_PLAYER};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Print the state as JSON instead of the board diagram
    #[arg(long)]
    pub json: bool,
}

/// Counters for a whole session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub clicks: usize,
    pub games_finished: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Point(Point),
    Reset,
    Quit,
    Unknown(String),
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs) -> Result<()> {
    tracing::info!("Starting interactive game (json={})", args.json);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = run_session(stdin.lock(), &mut stdout.lock(), args.json)?;

    tracing::info!(
        "Session ended: {} clicks, {} games finished",
        summary.clicks,
        summary.games_finished
    );
    Ok(())
}

/// Drive one session from `input` until EOF or `quit`
pub fn run_session<R: BufRead, W: Write>(input: R, out: &mut W, json: bool) -> Result<SessionSummary> {
    let mut state = GameState::new();
    let mut summary = SessionSummary::default();

    print_state(out, &state, json)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match command {
            Command::Quit => break,
            Command::Reset => {
                tracing::info!("Game reset by player");
                state = GameState::reset();
                writeln!(out, "game reset")?;
            }
            Command::Unknown(text) => {
                tracing::warn!("Unrecognized input: {}", text);
                writeln!(out, "expected a point id (0-23), 'reset' or 'quit'")?;
                continue;
            }
            Command::Point(point) => {
                let (next, events) = match state.apply(point) {
                    Ok(step) => step,
                    Err(e) => {
                        tracing::warn!("Rejected click: {}", e);
                        writeln!(out, "{}", e)?;
                        continue;
                    }
                };

                summary.clicks += 1;
                for event in &events {
                    report_event(out, event)?;
                }
                state = next;

                if let Some(winner) = state.winner() {
                    summary.games_finished += 1;
                    print_state(out, &state, json)?;
                    tracing::info!("Game over: {} wins", winner);
                    writeln!(out, "starting a new game")?;
                    state = GameState::reset();
                }
            }
        }

        print_state(out, &state, json)?;
    }

    Ok(summary)
}

// ============================================================================
// UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Option<Command> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    let command = match text.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Command::Quit,
        "r" | "reset" => Command::Reset,
        other => match other.parse::<Point>() {
            Ok(point) => Command::Point(point),
            Err(_) => Command::Unknown(text.to_string()),
        },
    };
    Some(command)
}

fn report_event<W: Write>(out: &mut W, event: &Event) -> Result<()> {
    match event {
        Event::InvalidMove { reason } => tracing::warn!("Invalid move: {}", reason),
        other => tracing::debug!("{}", other),
    }
    writeln!(out, "* {}", event)?;
    Ok(())
}

fn print_state<W: Write>(out: &mut W, state: &GameState, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", state.to_json()?)?;
    } else {
        writeln!(out, "{}", render_ascii(state.board()))?;
        writeln!(out, "{}", status_line(state))?;
    }
    Ok(())
}

/// One-line summary of whose turn it is and what they are expected to do
fn status_line(state: &GameState) -> String {
    let counts = |p: Player| {
        let ps = state.player_state(p);
        format!(
            "{} placed {}/{} live {}{}",
            p,
            ps.placed,
            PIECES_PER_PLAYER,
            ps.live,
            if ps.flying { " (flying)" } else { "" }
        )
    };

    let action = match (state.phase(), state.pending_remover(), state.selected_point()) {
        (_, _, _) if state.is_over() => "game over".to_string(),
        (Phase::Removal, Some(victim), _) => format!("remove one of {}'s pieces", victim),
        (Phase::Placement, _, _) => format!("{} to place", state.current_player()),
        (_, _, Some(from)) => format!("{} moving from {}", state.current_player(), from),
        _ => format!("{} to select a piece", state.current_player()),
    };

    format!(
        "[{:?}] {} | {} | {}",
        state.phase(),
        action,
        counts(Player::X),
        counts(Player::O)
    )
}

// ============================================================================
// TESTS
// ============================================================================
