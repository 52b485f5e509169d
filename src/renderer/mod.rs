//! Rendering module
//!
//! The simulation never draws. A host exposes its entity primitives through
//! `HostSurface`, and `SceneBinder` mirrors a `GameSession` onto it each frame.

pub mod binder;
pub mod retained;

pub use binder::SceneBinder;
pub use retained::{Node, NodeId, NodeKind, RetainedScene};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Draw order buckets, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrawLayer {
    Background,
    Entities,
    Player,
    Hud,
}

/// Entity primitives the host provides
///
/// Sprite positions are sprite centers; text positions are the top-left
/// anchor of the first line.
pub trait HostSurface {
    type Handle: Copy + Eq;

    /// Create a visual entity showing the image `key`
    fn create_sprite(&mut self, key: &str, layer: DrawLayer, pos: Vec2, size: Vec2) -> Self::Handle;
    /// Create a text entity on the HUD layer
    fn create_text(&mut self, text: &str, pos: Vec2) -> Self::Handle;
    fn set_position(&mut self, handle: Self::Handle, pos: Vec2);
    /// Select an animation frame of a sprite
    fn set_frame(&mut self, handle: Self::Handle, frame: u32);
    fn set_visible(&mut self, handle: Self::Handle, visible: bool);
    fn set_text(&mut self, handle: Self::Handle, text: &str);
    /// Remove an entity. Unknown handles are ignored.
    fn destroy(&mut self, handle: Self::Handle);
}

/// Placeholder fill colors for hosts without loaded images
pub mod colors {
    pub const BACKGROUND: &str = "#000033";
    pub const BACKGROUND_NEAR: &str = "#0b1a4a";
    pub const PLAYER: &str = "#33cc66";
    pub const OBSTACLE: &str = "#cc3333";
    pub const COIN: &str = "#f2c94c";
    pub const TEXT: &str = "#ffffff";
    pub const FALLBACK: &str = "#888888";

    /// Fill color for an image key
    pub fn for_key(key: &str) -> &'static str {
        match key {
            crate::consts::PLAYER_KEY => PLAYER,
            crate::consts::OBSTACLE_KEY => OBSTACLE,
            crate::consts::COIN_KEY => COIN,
            "background_far" => BACKGROUND,
            "background_near" => BACKGROUND_NEAR,
            _ => FALLBACK,
        }
    }
}
