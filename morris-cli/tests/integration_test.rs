//! Integration tests for the Morris rule engine
//!
//! Tests the public API end to end: placement, movement, flying, removal
//! and game over, plus invariants checked over seeded random games.

use morris_core::{
    mill, random_playout, Event, GameResult, GameState, InvalidReason, Phase, Player, Point,
    RuleError, Script, PIECES_PER_PLAYER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Apply clicks in order, collecting every event
fn play(state: &GameState, points: &[Point]) -> (GameState, Vec<Event>) {
    let mut state = state.clone();
    let mut events = Vec::new();
    for &p in points {
        let (next, mut evs) = state.apply(p).expect("click should be accepted");
        state = next;
        events.append(&mut evs);
    }
    (state, events)
}

fn invalid(reason: InvalidReason) -> Vec<Event> {
    vec![Event::InvalidMove { reason }]
}

/// 18 placements that never line up three of a kind
const MILL_FREE_OPENING: [Point; 18] = [0, 1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 15, 14, 18, 16, 20, 21];

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_mill_in_placement_starts_removal() {
    let (game, events) = play(&GameState::new(), &[0, 9, 1, 10, 2]);

    assert_eq!(events, vec![Event::MillFormed { player: Player::X }]);
    assert_eq!(game.phase(), Phase::Removal);
    assert_eq!(game.pending_remover(), Some(Player::O));
    assert_eq!(game.current_player(), Player::X);
}

#[test]
fn test_no_mill_across_opponent_piece() {
    // X on 0 and 2 with O between them is not a line
    let (game, events) = play(&GameState::new(), &[0, 1, 2]);
    assert!(events.is_empty());
    assert_eq!(game.phase(), Phase::Placement);
    assert_eq!(game.current_player(), Player::O);
}

#[test]
fn test_eighteenth_placement_starts_movement() {
    let (before, events) = play(&GameState::new(), &MILL_FREE_OPENING[..17]);
    assert!(events.is_empty());
    assert_eq!(before.phase(), Phase::Placement);
    assert_eq!(before.placed(Player::X), PIECES_PER_PLAYER);
    assert_eq!(before.placed(Player::O), PIECES_PER_PLAYER - 1);

    let (after, events) = before.apply(MILL_FREE_OPENING[17]).unwrap();
    assert!(events.is_empty());
    assert_eq!(after.phase(), Phase::Movement);
    assert_eq!(after.current_player(), Player::X);
    assert_eq!(after.live_count(Player::X), 9);
    assert_eq!(after.live_count(Player::O), 9);
}

#[test]
fn test_mill_on_last_placement_resumes_into_movement() {
    // O's 18th piece on 19 closes 16-19-22
    let opening: [Point; 18] = [0, 1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 15, 22, 18, 16, 20, 19];
    let (game, events) = play(&GameState::new(), &opening);
    assert_eq!(events, vec![Event::MillFormed { player: Player::O }]);
    assert_eq!(game.phase(), Phase::Removal);
    assert_eq!(game.previous_phase(), Some(Phase::Placement));
    assert_eq!(game.current_player(), Player::O);
    assert_eq!(game.validate(), Ok(()));

    // Taking X's loose 6 finishes placement; X moves first
    let (game, _) = game.apply(6).unwrap();
    assert_eq!(game.phase(), Phase::Movement);
    assert_eq!(game.current_player(), Player::X);
    assert_eq!(game.live_count(Player::X), 8);
    assert_eq!(game.live_count(Player::O), 9);
}

#[test]
fn test_double_mill_reports_once_and_removes_once() {
    // X's 0 closes 0-1-2 and 0-9-21 together
    let (game, events) = play(&GameState::new(), &[1, 3, 2, 4, 9, 6, 21, 7]);
    assert!(events.is_empty());

    let (game, events) = game.apply(0).unwrap();
    assert_eq!(mill::mills_formed_at(game.board(), 0, Player::X), 2);
    assert_eq!(events, vec![Event::MillFormed { player: Player::X }]);
    assert_eq!(game.phase(), Phase::Removal);
    assert_eq!(game.pending_remover(), Some(Player::O));

    let (game, events) = game.apply(3).unwrap();
    assert_eq!(
        events,
        vec![Event::PieceRemoved {
            player: Player::O,
            point: 3
        }]
    );
    assert_eq!(game.phase(), Phase::Placement);
    assert_eq!(game.pending_remover(), None);
    assert_eq!(game.current_player(), Player::O);
    assert_eq!(game.live_count(Player::O), 3);
}

// ============================================================================
// REMOVAL
// ============================================================================

#[test]
fn test_protected_mill_piece_rejected() {
    // O owns the mill 21-22-23 plus a loose piece on 9 when X closes 0-1-2
    let (game, _) = play(&GameState::new(), &[0, 21, 1, 22, 5, 23, 5, 6, 9, 2]);
    assert_eq!(game.phase(), Phase::Removal);
    assert_eq!(game.pending_remover(), Some(Player::O));

    let (next, events) = game.apply(21).unwrap();
    assert_eq!(events, invalid(InvalidReason::ProtectedByMill));
    assert_eq!(next, game);

    let (next, events) = game.apply(9).unwrap();
    assert_eq!(
        events,
        vec![Event::PieceRemoved {
            player: Player::O,
            point: 9
        }]
    );
    assert_eq!(next.phase(), Phase::Placement);
}

#[test]
fn test_mill_piece_removable_when_all_in_mills() {
    // Every O piece sits in 3-4-5 or 21-22-23; X slides 14 -> 2 closing 0-1-2
    let game = GameState::from_position(&[0, 1, 14, 17], &[3, 4, 5, 21, 22, 23], Player::X).unwrap();
    let (game, events) = play(&game, &[14, 2]);
    assert_eq!(events, vec![Event::MillFormed { player: Player::X }]);
    assert!(mill::all_in_mills(game.board(), Player::O));
    assert_eq!(game.removable_points(), vec![3, 4, 5, 21, 22, 23]);

    let (game, events) = game.apply(22).unwrap();
    assert_eq!(
        events,
        vec![Event::PieceRemoved {
            player: Player::O,
            point: 22
        }]
    );
    assert_eq!(game.board().get(22), None);
    assert_eq!(game.phase(), Phase::Movement);
    assert_eq!(game.current_player(), Player::O);
}

// ============================================================================
// MOVEMENT AND FLYING
// ============================================================================

#[test]
fn test_non_adjacent_move_rejected() {
    let game = GameState::from_position(&[9, 3, 5, 20], &[22, 17, 7, 14], Player::X).unwrap();
    let (selected, _) = game.apply(9).unwrap();
    assert_eq!(selected.selected_point(), Some(9));

    let (next, events) = selected.apply(11).unwrap();
    assert_eq!(events, invalid(InvalidReason::NotAdjacent));
    assert_eq!(next.selected_point(), None);
    assert_eq!(next.board(), game.board());
    assert_eq!(next, game);
}

#[test]
fn test_flying_player_moves_anywhere() {
    let game = GameState::from_position(&[0, 4, 13], &[22, 17, 6, 8], Player::X).unwrap();
    assert_eq!(game.phase(), Phase::Flying);
    assert!(game.can_fly(Player::X));
    assert!(!game.can_fly(Player::O));

    let (game, events) = play(&game, &[0, 23]);
    assert!(events.is_empty());
    assert_eq!(game.board().get(23), Some(Player::X));
    assert_eq!(game.board().get(0), None);
    assert_eq!(game.current_player(), Player::O);

    // O still has to move along the lines
    let (game, _) = game.apply(22).unwrap();
    let (_, events) = game.apply(2).unwrap();
    assert_eq!(events, invalid(InvalidReason::NotAdjacent));
}

#[test]
fn test_flying_flag_stays_until_reset() {
    let game = GameState::from_position(&[0, 4, 13], &[22, 17, 6, 8], Player::X).unwrap();
    let (game, _) = play(&game, &[0, 23, 22, 21]);
    assert!(game.can_fly(Player::X));
    assert!(!GameState::reset().can_fly(Player::X));
}

// ============================================================================
// GAME OVER
// ============================================================================

#[test]
fn test_two_pieces_ends_game() {
    // X flies 0 -> 2 closing 2-14-23; O drops from 3 to 2
    let game = GameState::from_position(&[0, 14, 23], &[4, 10, 19], Player::X).unwrap();
    let (game, events) = play(&game, &[0, 2]);
    assert_eq!(events, vec![Event::MillFormed { player: Player::X }]);
    assert_eq!(game.phase(), Phase::Removal);

    let (game, events) = game.apply(10).unwrap();
    assert_eq!(
        events,
        vec![
            Event::PieceRemoved {
                player: Player::O,
                point: 10
            },
            Event::GameOver { winner: Player::X },
        ]
    );
    assert_eq!(game.result(), GameResult::XWins);
    assert_eq!(game.apply(5), Err(RuleError::GameFinished { winner: Player::X }));

    let fresh = GameState::reset();
    assert!(fresh.apply(5).is_ok());
}

#[test]
fn test_point_out_of_range_fails_fast() {
    assert_eq!(GameState::new().apply(24), Err(RuleError::PointOutOfRange(24)));
    assert_eq!(GameState::new().apply(255), Err(RuleError::PointOutOfRange(255)));
}

#[test]
fn test_script_replay_matches_manual_play() {
    let script = Script::new(vec![0, 9, 1, 10, 2, 9]);
    let replay = script.replay().unwrap();
    let (manual, _) = play(&GameState::new(), &script.moves);
    assert_eq!(replay.final_state, manual);
}

// ============================================================================
// RANDOM GAME INVARIANTS
// ============================================================================

fn check_invariants(before: &GameState, after: &GameState, events: &[Event]) {
    let x = after.live_count(Player::X);
    let o = after.live_count(Player::O);

    assert_eq!(after.validate(), Ok(()));

    assert!(after.placed(Player::X) <= PIECES_PER_PLAYER);
    assert!(after.placed(Player::O) <= PIECES_PER_PLAYER);
    assert!(x <= after.placed(Player::X) && o <= after.placed(Player::O));
    assert!(x + o <= 2 * PIECES_PER_PLAYER);

    // Removal bookkeeping lives and dies together
    let removing = after.phase() == Phase::Removal;
    assert_eq!(after.pending_remover().is_some(), removing);
    assert_eq!(after.previous_phase().is_some(), removing);

    // Counts never grow once placement is over
    if before.placed(Player::X) == PIECES_PER_PLAYER && before.placed(Player::O) == PIECES_PER_PLAYER {
        assert!(x <= before.live_count(Player::X));
        assert!(o <= before.live_count(Player::O));
        assert_ne!(after.phase(), Phase::Placement);
    }

    for p in [Player::X, Player::O] {
        if after.can_fly(p) {
            assert!(after.live_count(p) <= 3);
        }
        if before.can_fly(p) {
            assert!(after.can_fly(p));
        }
    }

    let mills = events
        .iter()
        .filter(|e| matches!(e, Event::MillFormed { .. }))
        .count();
    assert!(mills <= 1);

    // A rejected click changes nothing but the pending selection
    if events.iter().any(|e| matches!(e, Event::InvalidMove { .. })) {
        assert_eq!(events.len(), 1);
        assert_eq!(after.board(), before.board());
        assert_eq!(after.phase(), before.phase());
        assert_eq!(after.current_player(), before.current_player());
        assert_eq!(after.selected_point(), None);
    }

    if after.is_over() {
        assert!(matches!(events.last(), Some(Event::GameOver { .. })));
    }
}

#[test]
fn test_random_games_keep_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..40 {
        let mut state = GameState::new();

        for _ in 0..600 {
            if state.is_over() {
                break;
            }

            // Mostly legal clicks, with some arbitrary ones mixed in
            let legal = state.legal_points();
            let point = if !legal.is_empty() && rng.gen_bool(0.7) {
                legal[rng.gen_range(0..legal.len())]
            } else {
                rng.gen_range(0..24)
            };

            let (next, events) = state.apply(point).unwrap();
            check_invariants(&state, &next, &events);

            if legal.contains(&point) {
                assert!(
                    !events.iter().any(|e| matches!(e, Event::InvalidMove { .. })),
                    "legal point {} was rejected in {:?}",
                    point,
                    state.phase()
                );
            }
            state = next;
        }
    }
}

#[test]
fn test_random_playouts_finish_or_hit_cap() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..20 {
        let record = random_playout(GameState::new(), &mut rng, 2000);
        assert!(record.plies <= 2000);
        if record.is_unfinished() {
            assert_eq!(record.plies, 2000);
        } else {
            assert!(record.final_state.legal_points().is_empty());
        }
    }
}
