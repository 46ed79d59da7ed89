//! Match rules: points, the win threshold and the delayed restart
//!
//! The restart is a one-shot deadline on the simulation clock, armed when the
//! match ends and consumed the first tick the clock reaches it.

use super::collision::OutOfPlay;
use super::state::{GameEvent, GameState, MatchPhase, MatchState, Side};

/// Handle a ball that left play: award the point (if any), serve a new ball
/// and end the match when the win threshold is reached
pub fn ball_out(state: &mut GameState, out: OutOfPlay) {
    match out {
        OutOfPlay::PastEnd { loser } => {
            let scorer = loser.opponent();
            match scorer {
                Side::Player => state.match_state.player_score += 1,
                Side::Ai => state.match_state.ai_score += 1,
            }
            log::info!(
                "{scorer:?} scores: {} - {}",
                state.match_state.player_score,
                state.match_state.ai_score
            );
            state.events.push(GameEvent::PointScored { scorer });
        }
        OutOfPlay::Dead => {
            log::debug!("Ball out of play at {:?}", state.ball.pos);
            state.events.push(GameEvent::BallOut);
        }
    }

    state.reset_ball();
    state.match_state.phase = MatchPhase::RoundOver;

    if let Some(winner) = winner(&state.match_state, state.tuning.win_score) {
        end_match(state, winner);
    }
}

/// The side that has reached `win_score`, if any
pub fn winner(match_state: &MatchState, win_score: u32) -> Option<Side> {
    if match_state.player_score >= win_score {
        Some(Side::Player)
    } else if match_state.ai_score >= win_score {
        Some(Side::Ai)
    } else {
        None
    }
}

/// Freeze the match and arm the restart deadline
fn end_match(state: &mut GameState, winner: Side) {
    if state.match_state.is_over() {
        return;
    }
    let restart_at = state.clock + state.tuning.restart_delay;
    state.match_state.phase = MatchPhase::MatchOver;
    state.match_state.winner = Some(winner);
    state.match_state.pending_restart_at = Some(restart_at);
    state.events.push(GameEvent::MatchOver { winner });
    log::info!(
        "Match over, {winner:?} wins {} - {}; restart at t={restart_at:.2}s",
        state.match_state.player_score,
        state.match_state.ai_score
    );
}

/// Fire the scheduled restart once its deadline has passed. Returns true if
/// the match restarted.
pub fn poll_restart(state: &mut GameState) -> bool {
    match state.match_state.pending_restart_at {
        Some(at) if state.clock >= at => {
            state.match_state = MatchState::default();
            state.reset_ball();
            state.events.push(GameEvent::MatchRestarted);
            log::info!("Match restarted");
            true
        }
        _ => false,
    }
}
