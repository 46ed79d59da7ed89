//! Game state and core simulation types
//!
//! Everything a running match mutates lives in [`GameState`]; the host owns
//! one instance per match.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Which end of the table an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human-driven, near end (negative z)
    Player,
    /// Autonomous, far end (positive z)
    Ai,
}

impl Side {
    /// Sign of the z-velocity a hit from this side produces
    #[inline]
    pub fn hit_sign(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Ai => -1.0,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    /// Linear velocity (m/s)
    pub vel: Vec3,
    /// Angular-velocity-like spin vector, drives the Magnus term
    pub spin: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A box-shaped paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec3,
    pub half_extents: Vec3,
    /// Displacement over the last tick divided by its dt (for impulse transfer)
    #[serde(skip)]
    pub vel: Vec3,
}

impl Paddle {
    pub fn new(side: Side, pos: Vec3, half_extents: Vec3) -> Self {
        Self {
            side,
            pos,
            half_extents,
            vel: Vec3::ZERO,
        }
    }

    /// Move toward `target` by at most `max_speed * dt`, then clamp the height
    /// into `[min_y, max_y]`. Records the resulting per-tick velocity.
    pub fn move_toward(&mut self, target: Vec3, dt: f32, max_speed: f32, min_y: f32, max_y: f32) {
        let before = self.pos;
        let mut next = crate::step_toward(before, target, max_speed * dt);
        next.y = next.y.clamp(min_y, max_y);
        self.pos = next;
        self.vel = if dt > 0.0 {
            (next - before) / dt
        } else {
            Vec3::ZERO
        };
    }
}

/// An axis-aligned static box (table, net)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBox {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl StaticBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    /// Whether (x, z) lies over the box's horizontal footprint
    #[inline]
    pub fn covers(&self, x: f32, z: f32) -> bool {
        (x - self.center.x).abs() < self.half_extents.x
            && (z - self.center.z).abs() < self.half_extents.z
    }
}

/// The table surface
pub type Table = StaticBox;
/// The net at mid-table
pub type Net = StaticBox;

/// Autonomous paddle controller memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    /// Point the AI paddle is moving toward
    pub target: Vec3,
    /// Seconds until the next re-aim is allowed
    pub reaction_timer: f32,
}

/// Match phase; the tick dispatches on this exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Rally in progress
    Playing,
    /// The ball just left play and was reset; play resumes next tick
    RoundOver,
    /// Win threshold reached; everything is frozen until the scheduled restart
    MatchOver,
}

/// Scores and match lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub player_score: u32,
    pub ai_score: u32,
    pub phase: MatchPhase,
    /// Clock time of the scheduled restart (set only while `MatchOver`)
    pub pending_restart_at: Option<f64>,
    pub winner: Option<Side>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            player_score: 0,
            ai_score: 0,
            phase: MatchPhase::Playing,
            pending_restart_at: None,
            winner: None,
        }
    }
}

impl MatchState {
    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::MatchOver
    }

    pub fn score_of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Ai => self.ai_score,
        }
    }

    /// Terminal message shown while the match is over
    pub fn banner(&self) -> Option<&'static str> {
        match (self.phase, self.winner) {
            (MatchPhase::MatchOver, Some(Side::Player)) => Some("You win!"),
            (MatchPhase::MatchOver, Some(Side::Ai)) => Some("You lose!"),
            _ => None,
        }
    }
}

/// Something noteworthy that happened during a tick (for sound/visual cues)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit { side: Side },
    NetHit,
    TableBounce,
    CeilingBounce,
    PointScored { scorer: Side },
    /// Ball left play without a point (floor, off the side)
    BallOut,
    MatchOver { winner: Side },
    MatchRestarted,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub table: Table,
    pub net: Net,
    pub ball: Ball,
    pub player: Paddle,
    pub ai_paddle: Paddle,
    pub ai: AiState,
    pub match_state: MatchState,
    /// Seconds of host time fed through `tick`
    pub clock: f64,
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match, serving the first ball
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            table: Table::new(tuning.table_center, tuning.table_half_extents),
            net: Net::new(tuning.net_center, tuning.net_half_extents),
            ball: Ball::new(tuning.ball_radius),
            player: Paddle::new(Side::Player, tuning.player_start, tuning.paddle_half_extents),
            ai_paddle: Paddle::new(Side::Ai, tuning.ai_start, tuning.paddle_half_extents),
            ai: AiState {
                target: tuning.ai_start,
                reaction_timer: tuning.ai_reaction_time,
            },
            match_state: MatchState::default(),
            clock: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        };

        state.reset_ball();
        state
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai_paddle,
        }
    }

    /// Put paddles and ball back at their starting points and serve a new
    /// ball toward the AI with randomized velocity and spin
    pub fn reset_ball(&mut self) {
        let t = &self.tuning;

        self.player.pos = t.player_start;
        self.player.vel = Vec3::ZERO;
        self.ai_paddle.pos = t.ai_start;
        self.ai_paddle.vel = Vec3::ZERO;

        self.ball.pos = t.ball_start;
        self.ball.vel = Vec3::new(
            symmetric(&mut self.rng, t.serve_lateral_speed),
            t.serve_lift_speed,
            t.serve_forward_speed,
        )
        .clamp_length_max(t.max_ball_speed);
        self.ball.spin = Vec3::new(
            symmetric(&mut self.rng, t.serve_spin.x),
            symmetric(&mut self.rng, t.serve_spin.y),
            symmetric(&mut self.rng, t.serve_spin.z),
        )
        .clamp_length_max(t.max_spin);

        self.ai.target = Vec3::new(self.ball.pos.x, self.ball.pos.y, self.ai_paddle.pos.z);
        self.ai.reaction_timer = t.ai_reaction_time;
    }

    /// A point was scored during the last tick
    pub fn just_scored(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::PointScored { .. }))
    }

    /// The match ended during the last tick
    pub fn match_just_ended(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::MatchOver { .. }))
    }
}

/// Uniform sample in `[-magnitude, magnitude]`; exactly zero when the range is empty
pub fn symmetric(rng: &mut Pcg32, magnitude: f32) -> f32 {
    if magnitude > 0.0 {
        rng.random_range(-magnitude..=magnitude)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_served() {
        let state = GameState::new(7, Tuning::default());
        let t = &state.tuning;
        assert_eq!(state.ball.pos, t.ball_start);
        assert!(state.ball.vel.z > 0.0, "serve must head toward the AI");
        assert_eq!(state.match_state, MatchState::default());
        assert_eq!(state.ai.target.z, t.ai_start.z);
    }

    #[test]
    fn test_reset_is_positionally_idempotent() {
        let mut state = GameState::new(42, Tuning::default());
        state.ball.pos = Vec3::new(3.0, -4.0, 9.0);
        state.player.pos = Vec3::new(-2.0, 1.5, -1.0);
        state.ai_paddle.pos = Vec3::new(1.0, 0.3, 3.0);

        state.reset_ball();
        let first = state.clone();
        state.reset_ball();

        assert_eq!(state.ball.pos, first.ball.pos);
        assert_eq!(state.player.pos, first.player.pos);
        assert_eq!(state.ai_paddle.pos, first.ai_paddle.pos);
        assert_eq!(state.ai, first.ai);
        assert_eq!(state.ball.radius, first.ball.radius);
        // Only the randomized serve differs
        assert_ne!(
            (state.ball.vel, state.ball.spin),
            (first.ball.vel, first.ball.spin)
        );
        assert_eq!(state.ball.vel.y, first.ball.vel.y);
        assert_eq!(state.ball.vel.z, first.ball.vel.z);
    }

    #[test]
    fn test_serve_stays_in_bounds() {
        let mut state = GameState::new(1, Tuning::default());
        for _ in 0..100 {
            state.reset_ball();
            let t = &state.tuning;
            assert!(state.ball.vel.x.abs() <= t.serve_lateral_speed);
            assert!(state.ball.spin.x.abs() <= t.serve_spin.x);
            assert!(state.ball.spin.y.abs() <= t.serve_spin.y);
            assert!(state.ball.spin.z.abs() <= t.serve_spin.z);
        }
    }

    #[test]
    fn test_symmetric_zero_magnitude() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(symmetric(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_paddle_move_clamps_height() {
        let mut paddle = Paddle::new(Side::Player, Vec3::new(0.0, 0.5, -1.0), Vec3::splat(0.1));
        paddle.move_toward(Vec3::new(0.0, -5.0, -1.0), 1.0, 100.0, 0.2, 1.8);
        assert_eq!(paddle.pos.y, 0.2);
        assert!((paddle.vel.y - -0.3).abs() < 1e-6);
    }

    #[test]
    fn test_paddle_zero_dt_has_no_velocity() {
        let mut paddle = Paddle::new(Side::Ai, Vec3::new(0.0, 0.5, 3.0), Vec3::splat(0.1));
        paddle.move_toward(Vec3::new(1.0, 1.0, 3.0), 0.0, 4.0, 0.2, 1.8);
        assert_eq!(paddle.pos, Vec3::new(0.0, 0.5, 3.0));
        assert_eq!(paddle.vel, Vec3::ZERO);
    }

    #[test]
    fn test_banner_only_when_over() {
        let mut m = MatchState::default();
        m.winner = Some(Side::Player);
        assert_eq!(m.banner(), None);
        m.phase = MatchPhase::MatchOver;
        assert_eq!(m.banner(), Some("You win!"));
    }
}
