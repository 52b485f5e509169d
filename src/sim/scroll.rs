//! Horizontal scrolling
//!
//! Background layers tile endlessly: a segment that leaves the viewport on
//! the left is moved to just right of the current rightmost segment. Coins
//! and the obstacle scroll at their own speeds and despawn off-screen.

use serde::{Deserialize, Serialize};

use super::spawn;
use super::state::{GameEvent, GameSession};
use crate::config::LayerConfig;

/// One background tile, identified by its slot in the layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub slot: usize,
    /// Left edge
    pub x: f32,
}

/// A parallax layer of contiguous tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundLayer {
    pub key: String,
    /// Scroll speed (pixels/second)
    pub speed: f32,
    pub tile_width: f32,
    pub segments: Vec<Segment>,
}

impl BackgroundLayer {
    /// Enough tiles to cover the viewport plus one spare
    pub fn new(config: &LayerConfig, viewport_width: f32) -> Self {
        let tile_width = config.tile_width.unwrap_or(viewport_width).max(1.0);
        let count = (viewport_width / tile_width).ceil() as usize + 1;
        let segments = (0..count)
            .map(|slot| Segment {
                slot,
                x: slot as f32 * tile_width,
            })
            .collect();
        Self {
            key: config.key.clone(),
            speed: config.speed,
            tile_width,
            segments,
        }
    }

    /// Left edge of the rightmost tile
    pub fn rightmost_x(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.x)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Move every tile left by `dx`, then recycle the ones that left the view
    pub fn scroll(&mut self, dx: f32) {
        for segment in &mut self.segments {
            segment.x -= dx;
        }

        // Recycle leftmost first so chained relocations stay contiguous
        let mut order: Vec<usize> = (0..self.segments.len()).collect();
        order.sort_by(|&a, &b| self.segments[a].x.total_cmp(&self.segments[b].x));
        for i in order {
            if self.segments[i].x + self.tile_width <= 0.0 {
                let next = self.rightmost_x() + self.tile_width;
                self.segments[i].x = next;
            }
        }
    }
}

/// Advance background, obstacle and coins by one tick
pub fn scroll_world(session: &mut GameSession) {
    let dt = session.dt();

    for layer in &mut session.background {
        let dx = layer.speed * dt;
        layer.scroll(dx);
    }

    if let Some(obstacle) = session.obstacle.as_mut() {
        obstacle.pos.x -= obstacle.speed * dt;
    }
    let exited = session
        .obstacle
        .as_ref()
        .filter(|o| o.right_edge() < 0.0)
        .map(|o| o.id);
    if let Some(id) = exited {
        session.obstacle = None;
        log::debug!("Obstacle {} left the screen", id);
        session.push_event(GameEvent::ObstacleExited { id });
        spawn::schedule_obstacle(session);
    }

    let coin_dx = session.config.coin_speed * dt;
    for coin in &mut session.coins {
        coin.pos.x -= coin_dx;
    }
    let mut expired = Vec::new();
    session.coins.retain(|coin| {
        let keep = coin.alive && coin.right_edge() >= 0.0;
        if !keep {
            expired.push(coin.id);
        }
        keep
    });
    for id in expired {
        session.push_event(GameEvent::CoinExpired { id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Coin;
    use glam::Vec2;
    use proptest::prelude::*;

    fn layer(tile_width: Option<f32>) -> BackgroundLayer {
        BackgroundLayer::new(
            &LayerConfig {
                key: "bg".to_string(),
                speed: 120.0,
                tile_width,
            },
            800.0,
        )
    }

    /// Sorted tiles must abut exactly and span the viewport
    fn assert_contiguous(layer: &BackgroundLayer, viewport_width: f32) {
        let mut xs: Vec<f32> = layer.segments.iter().map(|s| s.x).collect();
        xs.sort_by(f32::total_cmp);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - layer.tile_width).abs() < 1e-2);
        }
        assert!(xs[0] <= 0.0 && xs[0] + layer.tile_width > 0.0);
        assert!(xs[xs.len() - 1] + layer.tile_width >= viewport_width);
    }

    #[test]
    fn test_layer_covers_viewport() {
        assert_eq!(layer(None).segments.len(), 2);
        assert_eq!(layer(Some(300.0)).segments.len(), 4);
        assert_contiguous(&layer(Some(300.0)), 800.0);
    }

    #[test]
    fn test_offscreen_segment_moves_to_the_right() {
        let mut l = layer(None);
        l.scroll(800.0);
        // Slot 0 left the view and now follows slot 1
        assert_eq!(l.segments[0].x, 800.0);
        assert_eq!(l.segments[1].x, 0.0);
    }

    #[test]
    fn test_scroll_world_despawns_coins() {
        let mut session = GameSession::new(Default::default(), 3);
        let id = session.next_entity_id();
        session.coins.push(Coin::new(id, Vec2::new(-15.0, 300.0), 32.0));
        scroll_world(&mut session);
        assert!(session.coins.is_empty());
        assert_eq!(session.drain_events(), vec![GameEvent::CoinExpired { id }]);
    }

    proptest! {
        #[test]
        fn prop_segments_stay_contiguous(
            tile in prop::option::of(100.0f32..900.0),
            steps in proptest::collection::vec(0.0f32..50.0, 1..400),
        ) {
            let mut l = layer(tile);
            for dx in steps {
                l.scroll(dx);
            }
            assert_contiguous(&l, 800.0);
        }
    }
}
