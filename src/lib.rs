//! Taxman Runner - A side-scrolling coin runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, scrolling, spawning, collisions)
//! - `renderer`: Host surface abstraction and scene mirroring
//! - `config`: Data-driven gameplay constants

pub mod config;
pub mod renderer;
pub mod sim;

pub use config::{ControlScheme, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Sprite image keys shared by the simulation and the host
    pub const PLAYER_KEY: &str = "player";
    pub const OBSTACLE_KEY: &str = "taxman";
    pub const COIN_KEY: &str = "coin";
}

/// Convert a duration in seconds to a whole number of ticks (at least 1)
#[inline]
pub fn secs_to_ticks(secs: f32, tick_rate: u32) -> u64 {
    ((secs * tick_rate as f32).round() as u64).max(1)
}
