//! Ball flight: gravity, aerodynamic drag and Magnus lift
//!
//! Forces are applied as accelerations in a fixed order (gravity, drag,
//! Magnus), each against the velocity produced by the previous step, then the
//! speed is clamped and the position integrated (semi-implicit Euler).

use glam::Vec3;

use super::state::Ball;
use crate::Tuning;

/// Drag opposing `vel`: `-v̂ · ½ρ·Cd·A·|v|²`. Zero for a ball at rest.
pub fn drag_force(vel: Vec3, air_density: f32, drag_coefficient: f32, area: f32) -> Vec3 {
    let speed = vel.length();
    if speed == 0.0 {
        return Vec3::ZERO;
    }
    let magnitude = 0.5 * air_density * drag_coefficient * area * speed * speed;
    -(vel / speed) * magnitude
}

/// Magnus lift, perpendicular to both spin and velocity
#[inline]
pub fn magnus_force(vel: Vec3, spin: Vec3, magnus_coefficient: f32) -> Vec3 {
    spin.cross(vel) * magnus_coefficient
}

/// Rescale `vel` to `max_speed` if faster, keeping its direction
#[inline]
pub fn clamp_speed(vel: Vec3, max_speed: f32) -> Vec3 {
    vel.clamp_length_max(max_speed)
}

/// Advance the ball's velocity and position by `dt`
pub fn integrate(ball: &mut Ball, tuning: &Tuning, dt: f32) {
    let mut vel = ball.vel;

    vel.y += tuning.gravity * dt;
    vel += drag_force(
        vel,
        tuning.air_density,
        tuning.drag_coefficient,
        tuning.ball_area(),
    ) * dt;
    vel += magnus_force(vel, ball.spin, tuning.magnus_coefficient) * dt;

    ball.vel = clamp_speed(vel, tuning.max_ball_speed);
    ball.pos += ball.vel * dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball_with(vel: Vec3, spin: Vec3) -> Ball {
        Ball {
            pos: Vec3::new(0.0, 1.0, 0.0),
            vel,
            spin,
            radius: 0.075,
        }
    }

    #[test]
    fn test_zero_velocity_has_no_drag() {
        assert_eq!(drag_force(Vec3::ZERO, 1.2, 0.47, 0.02), Vec3::ZERO);
    }

    #[test]
    fn test_gravity_only() {
        let tuning = Tuning {
            air_density: 0.0,
            magnus_coefficient: 0.0,
            ..Tuning::default()
        };
        let mut ball = ball_with(Vec3::ZERO, Vec3::ZERO);
        integrate(&mut ball, &tuning, 0.1);
        assert!((ball.vel.y - tuning.gravity * 0.1).abs() < 1e-6);
        assert!((ball.pos.y - (1.0 + tuning.gravity * 0.01)).abs() < 1e-6);
        assert_eq!(ball.pos.x, 0.0);
    }

    #[test]
    fn test_topspin_dips_forward_ball() {
        // Spin about -x with the ball moving +z pushes it down
        let f = magnus_force(Vec3::new(0.0, 0.0, 10.0), Vec3::new(-5.0, 0.0, 0.0), 1.0);
        assert!(f.y < 0.0);
        assert_eq!(f.z, 0.0);
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let v = clamp_speed(Vec3::new(30.0, 40.0, 0.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-5);
        assert!((v.normalize() - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
        let slow = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(clamp_speed(slow, 10.0), slow);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let tuning = Tuning::default();
        let mut ball = ball_with(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let before = ball.clone();
        integrate(&mut ball, &tuning, 0.0);
        assert_eq!(ball, before);
    }

    fn vec3(range: f32) -> impl Strategy<Value = Vec3> {
        (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn speed_never_exceeds_max(
            vel in vec3(100.0),
            spin in vec3(200.0),
            dt in 0.0f32..0.1,
        ) {
            let tuning = Tuning::default();
            let mut ball = ball_with(vel, spin);
            integrate(&mut ball, &tuning, dt);
            prop_assert!(
                ball.speed() <= tuning.max_ball_speed * (1.0 + 1e-5),
                "speed {} above max {}",
                ball.speed(),
                tuning.max_ball_speed
            );
        }

        #[test]
        fn drag_opposes_velocity(vel in vec3(50.0)) {
            prop_assume!(vel.length() > 1e-3);
            let drag = drag_force(vel, 1.2, 0.47, 0.0177);
            let alignment = drag.normalize().dot(vel.normalize());
            prop_assert!(alignment < -0.999, "alignment {}", alignment);
        }
    }
}
