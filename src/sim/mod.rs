//! Simulation core
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Host-supplied elapsed time only
//! - Seeded RNG only
//! - Fixed per-tick stage order

pub mod ai;
pub mod collision;
pub mod physics;
pub mod player;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, OutOfPlay, sphere_box_collision};
pub use state::{
    AiState, Ball, GameEvent, GameState, MatchPhase, MatchState, Net, Paddle, Side, StaticBox,
    Table,
};
pub use tick::{TickInput, tick};
