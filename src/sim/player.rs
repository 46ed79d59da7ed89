//! Human paddle: normalized pointer → target position → speed-limited move

use glam::{Vec2, Vec3};

use super::state::Paddle;
use crate::Tuning;

/// Map a pointer in `[-1, 1]²` to the point the paddle should reach
pub fn pointer_target(pointer: Vec2, paddle_z: f32, tuning: &Tuning) -> Vec3 {
    let x = pointer.x * tuning.pointer_x_scale;
    let y = (pointer.y * tuning.pointer_y_scale + tuning.pointer_y_offset).max(tuning.pointer_min_y);
    Vec3::new(x, y, paddle_z)
}

/// Move the player paddle toward the pointer target
pub fn update(paddle: &mut Paddle, pointer: Vec2, tuning: &Tuning, dt: f32) {
    let target = pointer_target(pointer, paddle.pos.z, tuning);
    paddle.move_toward(
        target,
        dt,
        tuning.player_paddle_speed,
        tuning.paddle_min_y,
        tuning.paddle_max_y,
    );
}
