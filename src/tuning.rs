//! Data-driven simulation constants
//!
//! Loaded once per match from JSON (or defaults) and never mutated while a
//! match is running.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Ceiling for speeds, spins and noise magnitudes; keeps random ranges and
/// squared speeds finite
pub const MAX_MAGNITUDE: f32 = 1.0e6;

/// Every tunable number the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Stepping ===
    /// Longest single integration step; a tick's dt is split into these
    pub sim_dt: f32,
    /// Substeps per tick; time beyond `sim_dt * max_substeps` is dropped
    pub max_substeps: u32,

    // === Physics ===
    /// Vertical acceleration (m/s², negative is down)
    pub gravity: f32,
    pub air_density: f32,
    pub drag_coefficient: f32,
    pub magnus_coefficient: f32,
    pub ball_radius: f32,
    pub max_ball_speed: f32,
    pub max_spin: f32,

    // === Geometry ===
    pub table_center: Vec3,
    pub table_half_extents: Vec3,
    pub net_center: Vec3,
    pub net_half_extents: Vec3,
    pub paddle_half_extents: Vec3,
    pub player_start: Vec3,
    pub ai_start: Vec3,
    /// Legal vertical travel of both paddles
    pub paddle_min_y: f32,
    pub paddle_max_y: f32,
    pub ceiling_y: f32,
    pub floor_y: f32,
    pub player_out_z: f32,
    pub ai_out_z: f32,

    // === Contact response ===
    pub paddle_restitution: f32,
    pub paddle_min_return_speed: f32,
    pub paddle_offset_gain: f32,
    pub paddle_velocity_transfer: f32,
    pub paddle_spin_offset_gain: f32,
    pub paddle_spin_swing_gain: f32,
    /// Side/twist spin from a contact off the paddle's vertical centerline
    pub paddle_spin_lateral_gain: f32,
    pub paddle_push_out: f32,
    pub net_restitution: f32,
    pub net_lateral_damping: f32,
    pub net_spin_damping: f32,
    pub net_push_out: f32,
    pub bounce_damping: f32,
    /// Disable to let the ball fly over the ceiling height
    pub ceiling_enabled: bool,

    // === Player ===
    pub pointer_x_scale: f32,
    pub pointer_y_scale: f32,
    pub pointer_y_offset: f32,
    pub pointer_min_y: f32,
    pub player_paddle_speed: f32,

    // === AI ===
    pub ai_speed: f32,
    /// Max tracking error added to each forecast axis
    pub ai_error: f32,
    pub ai_reaction_time: f32,
    pub ai_reaction_jitter: f32,
    pub ai_alert_lateral_speed: f32,
    pub ai_alert_spin: f32,
    pub ai_alert_factor: f32,

    // === Serve ===
    pub ball_start: Vec3,
    pub serve_lateral_speed: f32,
    pub serve_lift_speed: f32,
    pub serve_forward_speed: f32,
    /// Per-axis bound of the random serve spin
    pub serve_spin: Vec3,

    // === Match ===
    pub win_score: u32,
    /// Seconds between match over and the automatic restart
    pub restart_delay: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,

            gravity: GRAVITY,
            air_density: AIR_DENSITY,
            drag_coefficient: DRAG_COEFFICIENT,
            magnus_coefficient: MAGNUS_COEFFICIENT,
            ball_radius: BALL_RADIUS,
            max_ball_speed: BALL_MAX_SPEED,
            max_spin: BALL_MAX_SPIN,

            table_center: TABLE_CENTER,
            table_half_extents: TABLE_HALF_EXTENTS,
            net_center: NET_CENTER,
            net_half_extents: NET_HALF_EXTENTS,
            paddle_half_extents: PADDLE_HALF_EXTENTS,
            player_start: PLAYER_START,
            ai_start: AI_START,
            paddle_min_y: PADDLE_MIN_Y,
            paddle_max_y: PADDLE_MAX_Y,
            ceiling_y: CEILING_Y,
            floor_y: FLOOR_Y,
            player_out_z: PLAYER_OUT_Z,
            ai_out_z: AI_OUT_Z,

            paddle_restitution: PADDLE_RESTITUTION,
            paddle_min_return_speed: PADDLE_MIN_RETURN_SPEED,
            paddle_offset_gain: PADDLE_OFFSET_GAIN,
            paddle_velocity_transfer: PADDLE_VELOCITY_TRANSFER,
            paddle_spin_offset_gain: PADDLE_SPIN_OFFSET_GAIN,
            paddle_spin_swing_gain: PADDLE_SPIN_SWING_GAIN,
            paddle_spin_lateral_gain: PADDLE_SPIN_LATERAL_GAIN,
            paddle_push_out: PADDLE_PUSH_OUT,
            net_restitution: NET_RESTITUTION,
            net_lateral_damping: NET_LATERAL_DAMPING,
            net_spin_damping: NET_SPIN_DAMPING,
            net_push_out: NET_PUSH_OUT,
            bounce_damping: BOUNCE_DAMPING,
            ceiling_enabled: true,

            pointer_x_scale: POINTER_X_SCALE,
            pointer_y_scale: POINTER_Y_SCALE,
            pointer_y_offset: POINTER_Y_OFFSET,
            pointer_min_y: POINTER_MIN_Y,
            player_paddle_speed: PLAYER_PADDLE_SPEED,

            ai_speed: AI_SPEED,
            ai_error: AI_ERROR,
            ai_reaction_time: AI_REACTION_TIME,
            ai_reaction_jitter: AI_REACTION_JITTER,
            ai_alert_lateral_speed: AI_ALERT_LATERAL_SPEED,
            ai_alert_spin: AI_ALERT_SPIN,
            ai_alert_factor: AI_ALERT_FACTOR,

            ball_start: BALL_START,
            serve_lateral_speed: SERVE_LATERAL_SPEED,
            serve_lift_speed: SERVE_LIFT_SPEED,
            serve_forward_speed: SERVE_FORWARD_SPEED,
            serve_spin: SERVE_SPIN,

            win_score: WIN_SCORE,
            restart_delay: RESTART_DELAY,
        }
    }
}

impl Tuning {
    /// Cross-sectional area of the ball (drag reference area)
    #[inline]
    pub fn ball_area(&self) -> f32 {
        std::f32::consts::PI * self.ball_radius * self.ball_radius
    }

    /// Parse tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Correct values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        fn finite(name: &str, value: &mut f32, fallback: f32) {
            if !value.is_finite() {
                log::warn!("tuning.{name} = {value} is not finite, using {fallback}");
                *value = fallback;
            }
        }
        fn finite_vec(name: &str, value: &mut Vec3, fallback: Vec3) {
            if !value.is_finite() {
                log::warn!("tuning.{name} = {value} is not finite, using {fallback}");
                *value = fallback;
            }
        }
        fn unit(name: &str, value: &mut f32) {
            let current = *value;
            if !(0.0..=1.0).contains(&current) {
                let fixed = if current.is_finite() { current.clamp(0.0, 1.0) } else { 0.0 };
                log::warn!("tuning.{name} = {current} out of [0, 1], using {fixed}");
                *value = fixed;
            }
        }
        fn non_negative(name: &str, value: &mut f32) {
            let current = *value;
            if current.is_nan() || current < 0.0 {
                log::warn!("tuning.{name} = {current} is negative, using 0");
                *value = 0.0;
            } else if current > MAX_MAGNITUDE {
                log::warn!("tuning.{name} = {current} too large, using {MAX_MAGNITUDE}");
                *value = MAX_MAGNITUDE;
            }
        }

        let defaults = Tuning::default();

        if !(self.sim_dt > 0.0 && self.sim_dt.is_finite()) {
            log::warn!("tuning.sim_dt = {} must be positive, using {}", self.sim_dt, defaults.sim_dt);
            self.sim_dt = defaults.sim_dt;
        }
        if self.max_substeps == 0 {
            log::warn!("tuning.max_substeps = 0, using 1");
            self.max_substeps = 1;
        }

        finite("gravity", &mut self.gravity, defaults.gravity);
        finite("air_density", &mut self.air_density, defaults.air_density);
        finite("drag_coefficient", &mut self.drag_coefficient, defaults.drag_coefficient);
        finite("magnus_coefficient", &mut self.magnus_coefficient, defaults.magnus_coefficient);
        finite("paddle_min_y", &mut self.paddle_min_y, defaults.paddle_min_y);
        finite("paddle_max_y", &mut self.paddle_max_y, defaults.paddle_max_y);
        finite("ceiling_y", &mut self.ceiling_y, defaults.ceiling_y);
        finite("floor_y", &mut self.floor_y, defaults.floor_y);
        finite("player_out_z", &mut self.player_out_z, defaults.player_out_z);
        finite("ai_out_z", &mut self.ai_out_z, defaults.ai_out_z);
        finite("paddle_offset_gain", &mut self.paddle_offset_gain, defaults.paddle_offset_gain);
        finite(
            "paddle_velocity_transfer",
            &mut self.paddle_velocity_transfer,
            defaults.paddle_velocity_transfer,
        );
        finite(
            "paddle_spin_offset_gain",
            &mut self.paddle_spin_offset_gain,
            defaults.paddle_spin_offset_gain,
        );
        finite(
            "paddle_spin_swing_gain",
            &mut self.paddle_spin_swing_gain,
            defaults.paddle_spin_swing_gain,
        );
        finite(
            "paddle_spin_lateral_gain",
            &mut self.paddle_spin_lateral_gain,
            defaults.paddle_spin_lateral_gain,
        );
        finite("pointer_x_scale", &mut self.pointer_x_scale, defaults.pointer_x_scale);
        finite("pointer_y_scale", &mut self.pointer_y_scale, defaults.pointer_y_scale);
        finite("pointer_y_offset", &mut self.pointer_y_offset, defaults.pointer_y_offset);
        finite("pointer_min_y", &mut self.pointer_min_y, defaults.pointer_min_y);
        finite("ai_alert_lateral_speed", &mut self.ai_alert_lateral_speed, defaults.ai_alert_lateral_speed);
        finite("ai_alert_spin", &mut self.ai_alert_spin, defaults.ai_alert_spin);
        finite("serve_lift_speed", &mut self.serve_lift_speed, defaults.serve_lift_speed);
        finite("serve_forward_speed", &mut self.serve_forward_speed, defaults.serve_forward_speed);

        finite_vec("table_center", &mut self.table_center, defaults.table_center);
        finite_vec("table_half_extents", &mut self.table_half_extents, defaults.table_half_extents);
        finite_vec("net_center", &mut self.net_center, defaults.net_center);
        finite_vec("net_half_extents", &mut self.net_half_extents, defaults.net_half_extents);
        finite_vec("paddle_half_extents", &mut self.paddle_half_extents, defaults.paddle_half_extents);
        finite_vec("player_start", &mut self.player_start, defaults.player_start);
        finite_vec("ai_start", &mut self.ai_start, defaults.ai_start);
        finite_vec("ball_start", &mut self.ball_start, defaults.ball_start);
        self.table_half_extents = self.table_half_extents.abs();
        self.net_half_extents = self.net_half_extents.abs();
        self.paddle_half_extents = self.paddle_half_extents.abs();

        unit("paddle_restitution", &mut self.paddle_restitution);
        unit("net_restitution", &mut self.net_restitution);
        unit("net_lateral_damping", &mut self.net_lateral_damping);
        unit("net_spin_damping", &mut self.net_spin_damping);
        unit("bounce_damping", &mut self.bounce_damping);

        non_negative("ball_radius", &mut self.ball_radius);
        non_negative("max_ball_speed", &mut self.max_ball_speed);
        non_negative("max_spin", &mut self.max_spin);
        non_negative("paddle_min_return_speed", &mut self.paddle_min_return_speed);
        non_negative("paddle_push_out", &mut self.paddle_push_out);
        non_negative("net_push_out", &mut self.net_push_out);
        non_negative("player_paddle_speed", &mut self.player_paddle_speed);
        non_negative("ai_speed", &mut self.ai_speed);
        non_negative("ai_error", &mut self.ai_error);
        non_negative("ai_reaction_time", &mut self.ai_reaction_time);
        non_negative("ai_reaction_jitter", &mut self.ai_reaction_jitter);
        non_negative("serve_lateral_speed", &mut self.serve_lateral_speed);
        self.serve_spin = self.serve_spin.abs();
        non_negative("serve_spin.x", &mut self.serve_spin.x);
        non_negative("serve_spin.y", &mut self.serve_spin.y);
        non_negative("serve_spin.z", &mut self.serve_spin.z);

        if !(self.ai_alert_factor >= 1.0) {
            log::warn!("tuning.ai_alert_factor = {} below 1, using 1", self.ai_alert_factor);
            self.ai_alert_factor = 1.0;
        } else if self.ai_alert_factor > MAX_MAGNITUDE {
            log::warn!("tuning.ai_alert_factor = {} too large, using {MAX_MAGNITUDE}", self.ai_alert_factor);
            self.ai_alert_factor = MAX_MAGNITUDE;
        }
        if self.paddle_min_y > self.paddle_max_y {
            log::warn!(
                "tuning paddle range [{}, {}] inverted, swapping",
                self.paddle_min_y,
                self.paddle_max_y
            );
            std::mem::swap(&mut self.paddle_min_y, &mut self.paddle_max_y);
        }
        if self.win_score == 0 {
            log::warn!("tuning.win_score = 0, using 1");
            self.win_score = 1;
        }
        if self.restart_delay.is_nan() || self.restart_delay < 0.0 {
            log::warn!("tuning.restart_delay = {} is negative, using 0", self.restart_delay);
            self.restart_delay = 0.0;
        } else if self.restart_delay.is_infinite() {
            log::warn!("tuning.restart_delay is infinite, using {}", defaults.restart_delay);
            self.restart_delay = defaults.restart_delay;
        }
        self
    }
}
