//! Collision detection and response
//!
//! The ball is a sphere; paddles, table and net are axis-aligned boxes. Each
//! check runs against the ball as left by the previous one, so several
//! contacts can resolve in the same tick.

use glam::Vec3;

use super::state::{Ball, Net, Paddle, Side, StaticBox, Table};
use crate::Tuning;

/// Result of a sphere/box overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the box to the sphere center
    pub point: Vec3,
    /// Overlap depth along the contact direction
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a sphere against an axis-aligned box
pub fn sphere_box_collision(
    center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> CollisionResult {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    let dist = (center - closest).length();

    if dist <= radius {
        CollisionResult {
            hit: true,
            point: closest,
            penetration: radius - dist,
        }
    } else {
        CollisionResult::miss()
    }
}

/// How the ball left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfPlay {
    /// Past the far boundary behind `loser`'s paddle; the opponent scores
    PastEnd { loser: Side },
    /// Fell through the floor or drifted off the side of the table
    Dead,
}

/// Resolve ball contact with a paddle. Returns true on a hit.
///
/// The ball is sent toward the opponent, picks up lateral speed from an
/// off-center contact and from the paddle's own motion, gains spin from both,
/// and is pushed clear of the paddle face so it cannot re-collide next tick.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle, t: &Tuning) -> bool {
    let contact = sphere_box_collision(ball.pos, ball.radius, paddle.pos, paddle.half_extents);
    if !contact.hit {
        return false;
    }

    let sign = paddle.side.hit_sign();
    let delta_x = ball.pos.x - paddle.pos.x;
    let delta_y = ball.pos.y - paddle.pos.y;
    let swing = paddle.vel;

    let return_speed = (ball.vel.z.abs() * t.paddle_restitution).max(t.paddle_min_return_speed);
    ball.vel.z = sign * return_speed;
    ball.vel.x += delta_x * t.paddle_offset_gain + swing.x * t.paddle_velocity_transfer;
    ball.vel.y += delta_y * t.paddle_offset_gain + swing.y * t.paddle_velocity_transfer;

    ball.spin += Vec3::new(
        delta_y * t.paddle_spin_offset_gain + swing.y,
        swing.x * t.paddle_spin_swing_gain + delta_x * t.paddle_spin_lateral_gain,
        delta_x * t.paddle_spin_lateral_gain,
    );
    ball.spin = ball.spin.clamp_length_max(t.max_spin);
    ball.vel = ball.vel.clamp_length_max(t.max_ball_speed);

    ball.pos.z = paddle.pos.z + sign * t.paddle_push_out;

    log::debug!(
        "{:?} paddle hit: offset ({delta_x:.2}, {delta_y:.2}), ball vel {:?}",
        paddle.side,
        ball.vel
    );
    true
}

/// Soft bounce off the net. Returns true on a hit.
pub fn resolve_net(ball: &mut Ball, net: &Net, t: &Tuning) -> bool {
    if !sphere_box_collision(ball.pos, ball.radius, net.center, net.half_extents).hit {
        return false;
    }

    ball.vel.z *= -t.net_restitution;
    ball.vel.x *= t.net_lateral_damping;
    ball.spin *= t.net_spin_damping;

    // Park the ball on the side it now travels toward
    let side = if ball.vel.z > 0.0 { 1.0 } else { -1.0 };
    ball.pos.z = net.center.z + side * (net.half_extents.z + t.net_push_out);
    true
}

/// Bounce off the table top. Returns true on a bounce.
pub fn resolve_table(ball: &mut Ball, table: &Table, t: &Tuning) -> bool {
    let bottom = ball.pos.y - ball.radius;
    if bottom >= table.top() || ball.pos.y < table.bottom() {
        return false;
    }
    if !table.covers(ball.pos.x, ball.pos.z) {
        return false;
    }

    ball.pos.y = table.top() + ball.radius;
    ball.vel.y = ball.vel.y.abs() * t.bounce_damping;
    true
}

/// Bounce off the ceiling. Returns true on a bounce.
pub fn resolve_ceiling(ball: &mut Ball, t: &Tuning) -> bool {
    if !t.ceiling_enabled || ball.pos.y + ball.radius <= t.ceiling_y {
        return false;
    }

    ball.pos.y = t.ceiling_y - ball.radius;
    ball.vel.y = -ball.vel.y.abs() * t.bounce_damping;
    true
}

/// Classify a ball that has left play, if it has
pub fn check_out_of_play(ball: &Ball, table: &StaticBox, t: &Tuning) -> Option<OutOfPlay> {
    if ball.pos.z > t.ai_out_z {
        return Some(OutOfPlay::PastEnd { loser: Side::Ai });
    }
    if ball.pos.z < t.player_out_z {
        return Some(OutOfPlay::PastEnd {
            loser: Side::Player,
        });
    }
    if ball.pos.y < t.floor_y {
        return Some(OutOfPlay::Dead);
    }

    let off_side = (ball.pos.x - table.center.x).abs() > table.half_extents.x + ball.radius;
    if off_side && ball.pos.y < table.top() {
        return Some(OutOfPlay::Dead);
    }
    None
}
