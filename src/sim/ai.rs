//! Autonomous paddle: forecast the ball's crossing of the paddle plane, aim
//! with some error, and chase the aim point at a bounded speed
//!
//! Re-aiming is gated by a reaction timer that only runs while the ball is
//! heading toward the AI, so the paddle lags behind sudden changes the way a
//! person would.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AiState, Ball, Paddle, symmetric};
use crate::Tuning;

/// Where the ball will cross the plane `z = plane_z`, assuming constant x/z
/// velocity and constant gravity in y
///
/// The height is clamped into `[min_y, max_y]`. A ball with no z-velocity
/// never crosses, so its current x/y is used instead.
pub fn forecast_intercept(ball: &Ball, plane_z: f32, gravity: f32, min_y: f32, max_y: f32) -> Vec3 {
    if ball.vel.z == 0.0 {
        return Vec3::new(ball.pos.x, ball.pos.y, plane_z);
    }

    // A ball already past the plane is tracked where it is
    let t = ((plane_z - ball.pos.z) / ball.vel.z).max(0.0);
    let x = ball.pos.x + ball.vel.x * t;
    let y = ball.pos.y + ball.vel.y * t + 0.5 * gravity * t * t;
    Vec3::new(x, y.clamp(min_y, max_y), plane_z)
}

/// Forecast plus independent tracking error on x and y
pub fn aim(ball: &Ball, paddle: &Paddle, tuning: &Tuning, rng: &mut Pcg32) -> Vec3 {
    let mut target = forecast_intercept(
        ball,
        paddle.pos.z,
        tuning.gravity,
        tuning.paddle_min_y,
        tuning.paddle_max_y,
    );
    target.x += symmetric(rng, tuning.ai_error);
    target.y += symmetric(rng, tuning.ai_error);
    target
}

/// Reaction timer drain rate; faster against wide or heavily spun shots
fn attentiveness(ball: &Ball, tuning: &Tuning) -> f32 {
    let alert = ball.vel.x.abs() > tuning.ai_alert_lateral_speed
        || ball.spin.length() > tuning.ai_alert_spin;
    if alert { tuning.ai_alert_factor } else { 1.0 }
}

/// Advance the AI by one tick: maybe re-aim, then move toward the target
pub fn update(ai: &mut AiState, paddle: &mut Paddle, ball: &Ball, tuning: &Tuning, rng: &mut Pcg32, dt: f32) {
    if ball.vel.z > 0.0 {
        ai.reaction_timer -= dt * attentiveness(ball, tuning);
        if ai.reaction_timer <= 0.0 {
            ai.target = aim(ball, paddle, tuning, rng);
            ai.reaction_timer = tuning.ai_reaction_time + jitter(rng, tuning.ai_reaction_jitter);
            log::debug!("AI re-aimed at {:?}", ai.target);
        }
    }

    paddle.move_toward(
        ai.target,
        dt,
        tuning.ai_speed,
        tuning.paddle_min_y,
        tuning.paddle_max_y,
    );
}

/// Uniform sample in `[0, max]`
fn jitter(rng: &mut Pcg32, max: f32) -> f32 {
    if max > 0.0 { rng.random_range(0.0..=max) } else { 0.0 }
}
