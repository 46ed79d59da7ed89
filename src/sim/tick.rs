//! Per-frame simulation step
//!
//! One call advances the whole match by the host's elapsed time. Live play is
//! split into fixed substeps of at most `sim_dt`, each in a fixed order:
//! player input, AI, collisions (paddles, net, table, ceiling), ball flight,
//! then out-of-play / scoring.

use glam::Vec2;

use super::state::{GameEvent, GameState, MatchPhase};
use super::{ai, collision, physics, player, scoring};

/// Host input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Normalized pointer position, each axis in `[-1, 1]`
    pub pointer: Vec2,
}

impl TickInput {
    pub fn pointer(x: f32, y: f32) -> Self {
        Self {
            pointer: Vec2::new(x, y),
        }
    }

    /// Pointer clamped into `[-1, 1]²`, non-finite axes centered
    fn sanitized_pointer(&self) -> Vec2 {
        let axis = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Vec2::new(axis(self.pointer.x), axis(self.pointer.y))
    }
}

/// Advance the match by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid tick dt {dt}");
        0.0
    };
    if dt == 0.0 {
        return;
    }

    state.clock += f64::from(dt);
    state.time_ticks += 1;

    match state.match_state.phase {
        MatchPhase::MatchOver => {
            scoring::poll_restart(state);
            return;
        }
        MatchPhase::RoundOver => state.match_state.phase = MatchPhase::Playing,
        MatchPhase::Playing => {}
    }

    let pointer = input.sanitized_pointer();
    let sim_dt = state.tuning.sim_dt;
    let mut remaining = dt;
    let mut steps = 0;
    while remaining > 0.0 && steps < state.tuning.max_substeps {
        let step = remaining.min(sim_dt);
        step_rally(state, pointer, step);
        remaining -= step;
        steps += 1;

        // Point scored or match over: the rest of this tick is dropped
        if state.match_state.phase != MatchPhase::Playing {
            return;
        }
    }
    if remaining > 0.0 {
        log::debug!("Tick dt {dt} exceeds {steps} substeps, dropping {remaining}s");
    }
}

/// One substep of live play
fn step_rally(state: &mut GameState, pointer: Vec2, dt: f32) {
    let GameState {
        tuning,
        rng,
        ball,
        player: player_paddle,
        ai_paddle,
        ai: ai_state,
        table,
        net,
        events,
        ..
    } = state;

    player::update(player_paddle, pointer, tuning, dt);
    ai::update(ai_state, ai_paddle, ball, tuning, rng, dt);

    for paddle in [&*player_paddle, &*ai_paddle] {
        if collision::resolve_paddle(ball, paddle, tuning) {
            events.push(GameEvent::PaddleHit { side: paddle.side });
        }
    }
    if collision::resolve_net(ball, net, tuning) {
        events.push(GameEvent::NetHit);
    }
    if collision::resolve_table(ball, table, tuning) {
        events.push(GameEvent::TableBounce);
    }
    if collision::resolve_ceiling(ball, tuning) {
        events.push(GameEvent::CeilingBounce);
    }

    physics::integrate(ball, tuning, dt);

    if let Some(out) = collision::check_out_of_play(ball, table, tuning) {
        scoring::ball_out(state, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::state::Side;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn state() -> GameState {
        GameState::new(12345, Tuning::default())
    }

    #[test]
    fn test_ball_flies_during_play() {
        let mut s = state();
        let start = s.ball.pos;
        tick(&mut s, &TickInput::default(), DT);
        assert_ne!(s.ball.pos, start);
        assert_eq!(s.time_ticks, 1);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut s = state();
        let before = s.clone();
        tick(&mut s, &TickInput::pointer(1.0, 1.0), 0.0);
        assert_eq!(s.ball, before.ball);
        assert_eq!(s.player, before.player);
        assert_eq!(s.clock, 0.0);
    }

    #[test]
    fn test_negative_dt_is_rejected() {
        let mut s = state();
        let before = s.ball.clone();
        tick(&mut s, &TickInput::default(), -0.5);
        tick(&mut s, &TickInput::default(), f32::NAN);
        assert_eq!(s.ball, before);
        assert_eq!(s.clock, 0.0);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let mut wild = state();
        let mut edge = state();
        tick(&mut wild, &TickInput::pointer(40.0, -7.0), DT);
        tick(&mut edge, &TickInput::pointer(1.0, -1.0), DT);
        assert_eq!(wild.player.pos, edge.player.pos);
    }

    #[test]
    fn test_scoring_past_ai_end() {
        let mut s = state();
        s.ball.pos = Vec3::new(0.0, 1.0, 6.0);
        s.ball.vel = Vec3::new(0.0, 0.0, 1.0);

        tick(&mut s, &TickInput::default(), DT);

        assert_eq!(s.match_state.player_score, 1);
        assert_eq!(s.match_state.ai_score, 0);
        assert_eq!(s.ball.pos, s.tuning.ball_start);
        assert_eq!(s.ball.vel.z, s.tuning.serve_forward_speed);
        assert!(s.just_scored());
        assert!(!s.match_just_ended());

        // Next tick resumes play with the edge signal cleared
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.match_state.phase, MatchPhase::Playing);
        assert!(!s.just_scored());
    }

    #[test]
    fn test_scoring_past_player_end() {
        let mut s = state();
        s.ball.pos = Vec3::new(0.0, 1.0, -4.0);
        s.ball.vel = Vec3::new(0.0, 0.0, -1.0);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!((s.match_state.player_score, s.match_state.ai_score), (0, 1));
    }

    #[test]
    fn test_win_then_delayed_restart() {
        let mut s = state();
        s.match_state.player_score = 6;
        s.match_state.ai_score = 4;
        s.ball.pos = Vec3::new(0.0, 1.0, 6.0);

        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.match_state.player_score, 7);
        assert!(s.match_state.is_over());
        assert!(s.match_state.pending_restart_at.is_some());
        assert!(s.match_just_ended());

        // Frozen: nothing moves until the restart
        let frozen_ball = s.ball.clone();
        let frozen_player = s.player.clone();
        for _ in 0..60 {
            tick(&mut s, &TickInput::pointer(1.0, 1.0), DT);
        }
        assert!(s.match_state.is_over());
        assert_eq!(s.ball, frozen_ball);
        assert_eq!(s.player, frozen_player);
        assert!(!s.match_just_ended());

        // Irregular host timing still fires exactly once
        tick(&mut s, &TickInput::default(), 5.0);
        assert!(!s.match_state.is_over());
        assert_eq!((s.match_state.player_score, s.match_state.ai_score), (0, 0));
        assert_eq!(s.match_state.pending_restart_at, None);
        assert_eq!(s.match_state.banner(), None);
        assert_eq!(s.events, vec![GameEvent::MatchRestarted]);

        tick(&mut s, &TickInput::default(), 5.0);
        assert!(!s.events.contains(&GameEvent::MatchRestarted));
    }

    #[test]
    fn test_scores_monotonic_during_play() {
        let mut s = state();
        let mut last = (0, 0);
        for i in 0..6000 {
            let x = ((i as f32) * 0.013).sin();
            tick(&mut s, &TickInput::pointer(x, 0.0), DT);
            if s.match_state.is_over() {
                break;
            }
            let now = (s.match_state.player_score, s.match_state.ai_score);
            assert!(now.0 >= last.0 && now.1 >= last.1);
            last = now;
        }
    }

    #[test]
    fn test_paddle_hit_reported() {
        let mut s = state();
        s.ball.pos = s.tuning.ai_start;
        s.ball.vel = Vec3::new(0.0, 0.0, 4.0);
        tick(&mut s, &TickInput::default(), DT);
        assert!(s.events.contains(&GameEvent::PaddleHit { side: Side::Ai }));
        assert!(s.ball.vel.z < 0.0);
    }

    #[test]
    fn test_fast_ball_at_low_frame_rate_hits_paddle() {
        let mut s = state();
        s.ball.pos = Vec3::new(0.0, 0.5, 2.45);
        s.ball.vel = Vec3::new(0.0, 0.0, 12.0);
        s.ball.spin = Vec3::ZERO;
        s.ai.target = s.ai_paddle.pos;
        s.ai.reaction_timer = 10.0;

        let mut hit = false;
        for _ in 0..10 {
            tick(&mut s, &TickInput::default(), 1.0 / 30.0);
            if s.events.contains(&GameEvent::PaddleHit { side: Side::Ai }) {
                hit = true;
                break;
            }
            assert!(!s.just_scored(), "ball passed through the AI paddle");
        }
        assert!(hit);
        assert!(s.ball.vel.z < 0.0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut s = state();
        let start_z = s.ball.pos.z;
        tick(&mut s, &TickInput::default(), 1.0);
        let cap = s.tuning.sim_dt * s.tuning.max_substeps as f32;
        assert!(s.ball.pos.z - start_z <= s.tuning.max_ball_speed * cap + 1e-4);
        assert_eq!(s.clock, 1.0);
    }

    #[test]
    fn test_same_seed_same_match() {
        let mut a = state();
        let mut b = state();
        for i in 0..600 {
            let input = TickInput::pointer(((i as f32) * 0.02).cos(), 0.1);
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.ball, b.ball);
        assert_eq!(a.ai_paddle, b.ai_paddle);
        assert_eq!(a.match_state, b.match_state);
    }
}
