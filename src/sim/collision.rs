//! Axis-aligned bounding-box collision
//!
//! Every entity is a rectangle described by its center and size. The player
//! is tested against the obstacle's (shrunken) hitbox and against each coin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Coin, Obstacle, Player};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Same center, size scaled per axis
    pub fn scaled(&self, factor: Vec2) -> Self {
        Self::from_center(self.center(), self.size() * factor)
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Does the player overlap the obstacle's hitbox?
pub fn player_hits_obstacle(player: &Player, obstacle: &Obstacle) -> bool {
    player.bounds().intersects(&obstacle.hitbox())
}

/// Indices of coins the player overlaps, in creation order
pub fn coins_touching(player: &Player, coins: &[Coin]) -> Vec<usize> {
    let bounds = player.bounds();
    coins
        .iter()
        .enumerate()
        .filter(|(_, coin)| coin.alive && bounds.intersects(&coin.bounds()))
        .map(|(i, _)| i)
        .collect()
}
