//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (coins in creation order, timers by due tick)
//! - No rendering or platform dependencies

pub mod collision;
pub mod kinematics;
pub mod score;
pub mod scroll;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::Aabb;
pub use score::ScoreTracker;
pub use scroll::{BackgroundLayer, Segment};
pub use state::{Coin, GameEvent, GamePhase, GameSession, JumpState, Obstacle, Player};
pub use tick::{TickInput, fire_timer, game_over, tick};
pub use timer::{TimerAction, TimerId, TimerQueue};
