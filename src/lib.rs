//! Table Pong - a 3D table tennis simulation core
//!
//! Core modules:
//! - `sim`: Simulation (ball physics, collisions, AI opponent, match rules)
//! - `tuning`: Data-driven constants for physics, geometry, AI and rules
//!
//! Rendering, windowing and raw input polling live in the host. The host calls
//! [`sim::tick`] once per frame with the elapsed time and a normalized pointer.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec3;

/// Default tuning values
///
/// Units are meters, seconds and radians. Positive z points from the player
/// toward the AI; positive y is up.
pub mod consts {
    use glam::Vec3;

    /// Longest single integration step (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per tick to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    // Physics
    pub const GRAVITY: f32 = -9.81;
    pub const AIR_DENSITY: f32 = 1.2;
    pub const DRAG_COEFFICIENT: f32 = 0.47;
    pub const MAGNUS_COEFFICIENT: f32 = 0.0008;
    pub const BALL_RADIUS: f32 = 0.075;
    pub const BALL_MAX_SPEED: f32 = 15.0;
    /// Keeps accumulated spin (and the Magnus term) bounded
    pub const BALL_MAX_SPIN: f32 = 40.0;

    // Table: 2m wide, 4m deep, 0.1m thick, centered at z = 1
    pub const TABLE_CENTER: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    pub const TABLE_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.05, 2.0);

    // Net spans slightly wider than the table
    pub const NET_CENTER: Vec3 = Vec3::new(0.0, 0.15, 1.0);
    pub const NET_HALF_EXTENTS: Vec3 = Vec3::new(1.05, 0.15, 0.025);

    // Paddles
    pub const PADDLE_HALF_EXTENTS: Vec3 = Vec3::new(0.2, 0.2, 0.05);
    pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.5, -1.0);
    pub const AI_START: Vec3 = Vec3::new(0.0, 0.5, 3.0);
    pub const PADDLE_MIN_Y: f32 = 0.2;
    pub const PADDLE_MAX_Y: f32 = 1.8;

    // Play volume
    pub const CEILING_Y: f32 = 2.0;
    /// Ball below this height is dead
    pub const FLOOR_Y: f32 = -1.0;
    /// Ball behind the player past this z: point to the AI
    pub const PLAYER_OUT_Z: f32 = -3.5;
    /// Ball behind the AI past this z: point to the player
    pub const AI_OUT_Z: f32 = 5.5;

    // Paddle contact response
    pub const PADDLE_RESTITUTION: f32 = 0.95;
    pub const PADDLE_MIN_RETURN_SPEED: f32 = 3.0;
    pub const PADDLE_OFFSET_GAIN: f32 = 2.0;
    pub const PADDLE_VELOCITY_TRANSFER: f32 = 0.3;
    pub const PADDLE_SPIN_OFFSET_GAIN: f32 = 3.0;
    pub const PADDLE_SPIN_SWING_GAIN: f32 = 0.5;
    pub const PADDLE_SPIN_LATERAL_GAIN: f32 = 2.0;
    pub const PADDLE_PUSH_OUT: f32 = 0.15;

    // Net contact response (soft bounce)
    pub const NET_RESTITUTION: f32 = 0.5;
    pub const NET_LATERAL_DAMPING: f32 = 0.5;
    pub const NET_SPIN_DAMPING: f32 = 0.8;
    pub const NET_PUSH_OUT: f32 = 0.1;

    /// Vertical speed kept after a table or ceiling bounce
    pub const BOUNCE_DAMPING: f32 = 0.85;

    // Player paddle mapping
    pub const POINTER_X_SCALE: f32 = 5.0;
    pub const POINTER_Y_SCALE: f32 = 4.0;
    pub const POINTER_Y_OFFSET: f32 = 1.0;
    pub const POINTER_MIN_Y: f32 = 0.1;
    pub const PLAYER_PADDLE_SPEED: f32 = 5.0;

    // AI opponent
    pub const AI_SPEED: f32 = 4.0;
    pub const AI_ERROR: f32 = 0.25;
    pub const AI_REACTION_TIME: f32 = 0.2;
    pub const AI_REACTION_JITTER: f32 = 0.1;
    pub const AI_ALERT_LATERAL_SPEED: f32 = 3.0;
    pub const AI_ALERT_SPIN: f32 = 10.0;
    /// Reaction timer drain rate while alert
    pub const AI_ALERT_FACTOR: f32 = 1.5;

    // Serve
    pub const BALL_START: Vec3 = Vec3::new(0.0, 0.65, -0.7);
    pub const SERVE_LATERAL_SPEED: f32 = 1.0;
    pub const SERVE_LIFT_SPEED: f32 = 3.0;
    pub const SERVE_FORWARD_SPEED: f32 = 5.0;
    pub const SERVE_SPIN: Vec3 = Vec3::new(2.0, 2.0, 1.0);

    // Match rules
    pub const WIN_SCORE: u32 = 7;
    pub const RESTART_DELAY: f64 = 3.0;
}

/// Move `from` toward `to` by at most `max_step` (Euclidean distance)
#[inline]
pub fn step_toward(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    from + (to - from).clamp_length_max(max_step.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_bounded() {
        let next = step_toward(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), 1.0);
        assert!((next.length() - 1.0).abs() < 1e-6);
        assert!((next - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_step_toward_reaches_close_target() {
        let target = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(step_toward(Vec3::ZERO, target, 1.0), target);
        assert_eq!(step_toward(target, target, 1.0), target);
    }
}
