//! Mirrors simulation state onto a `HostSurface`
//!
//! The binder remembers which host handle belongs to which simulation entity
//! and issues create/update/destroy calls so the surface matches the session
//! after every `sync`.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{DrawLayer, HostSurface};
use crate::consts::{COIN_KEY, OBSTACLE_KEY, PLAYER_KEY};
use crate::sim::GameSession;

/// Top-left anchor of the score text
const SCORE_TEXT_POS: Vec2 = Vec2::new(16.0, 16.0);

pub struct SceneBinder<H> {
    player: Option<H>,
    score_text: Option<H>,
    game_over_text: Option<H>,
    /// (entity id, handle)
    obstacle: Option<(u32, H)>,
    coins: BTreeMap<u32, H>,
    /// Keyed by (layer index, segment slot)
    segments: BTreeMap<(usize, usize), H>,
    /// Viewport the background handles were created for
    viewport: Vec2,
}

impl<H> Default for SceneBinder<H> {
    fn default() -> Self {
        Self {
            player: None,
            score_text: None,
            game_over_text: None,
            obstacle: None,
            coins: BTreeMap::new(),
            segments: BTreeMap::new(),
            viewport: Vec2::ZERO,
        }
    }
}

impl<H: Copy + Eq> SceneBinder<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of simulation entities currently bound
    pub fn bound_count(&self) -> usize {
        self.player.iter().count()
            + self.score_text.iter().count()
            + self.game_over_text.iter().count()
            + self.obstacle.iter().count()
            + self.coins.len()
            + self.segments.len()
    }

    /// Bring the surface in line with the session
    pub fn sync<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        self.sync_background(session, surface);
        self.sync_obstacle(session, surface);
        self.sync_coins(session, surface);
        self.sync_player(session, surface);
        self.sync_hud(session, surface);
    }

    fn sync_background<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        let viewport = Vec2::new(session.config.viewport_width, session.config.viewport_height);
        if viewport != self.viewport {
            // Tile sizes depend on the viewport; rebuild from scratch
            for (_, handle) in std::mem::take(&mut self.segments) {
                surface.destroy(handle);
            }
            self.viewport = viewport;
        }

        for (layer_idx, layer) in session.background.iter().enumerate() {
            let size = Vec2::new(layer.tile_width, viewport.y);
            for segment in &layer.segments {
                let center = Vec2::new(segment.x + layer.tile_width / 2.0, viewport.y / 2.0);
                let handle = *self
                    .segments
                    .entry((layer_idx, segment.slot))
                    .or_insert_with(|| {
                        surface.create_sprite(&layer.key, DrawLayer::Background, center, size)
                    });
                surface.set_position(handle, center);
            }
        }
    }

    fn sync_obstacle<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        let current = session.obstacle.as_ref().map(|o| o.id);
        if let Some((id, handle)) = self.obstacle {
            if current != Some(id) {
                surface.destroy(handle);
                self.obstacle = None;
            }
        }
        if let Some(obstacle) = session.obstacle.as_ref() {
            let handle = match self.obstacle {
                Some((_, handle)) => handle,
                None => {
                    let handle = surface.create_sprite(
                        OBSTACLE_KEY,
                        DrawLayer::Entities,
                        obstacle.pos,
                        obstacle.size,
                    );
                    self.obstacle = Some((obstacle.id, handle));
                    handle
                }
            };
            surface.set_position(handle, obstacle.pos);
        }
    }

    fn sync_coins<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        self.coins.retain(|id, handle| {
            let alive = session.coins.iter().any(|c| c.id == *id);
            if !alive {
                surface.destroy(*handle);
            }
            alive
        });
        for coin in &session.coins {
            let handle = *self.coins.entry(coin.id).or_insert_with(|| {
                surface.create_sprite(COIN_KEY, DrawLayer::Entities, coin.pos, coin.size)
            });
            surface.set_position(handle, coin.pos);
        }
    }

    fn sync_player<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        let player = &session.player;
        let handle = *self.player.get_or_insert_with(|| {
            surface.create_sprite(PLAYER_KEY, DrawLayer::Player, player.pos, player.size)
        });
        surface.set_position(handle, player.pos);
        surface.set_frame(handle, player.frame);
    }

    fn sync_hud<S: HostSurface<Handle = H>>(&mut self, session: &GameSession, surface: &mut S) {
        let text = session.score.text();
        let handle = *self
            .score_text
            .get_or_insert_with(|| surface.create_text(text, SCORE_TEXT_POS));
        surface.set_text(handle, text);

        if let Some(message) = session.game_over_text.as_deref() {
            let pos = Vec2::new(
                session.config.viewport_width / 2.0 - 120.0,
                session.config.viewport_height / 2.0 - 20.0,
            );
            let handle = *self
                .game_over_text
                .get_or_insert_with(|| surface.create_text(message, pos));
            surface.set_text(handle, message);
        }
    }

    /// Destroy every bound entity (session teardown)
    pub fn clear<S: HostSurface<Handle = H>>(&mut self, surface: &mut S) {
        let singles = [self.player.take(), self.score_text.take(), self.game_over_text.take()];
        for handle in singles.into_iter().flatten() {
            surface.destroy(handle);
        }
        if let Some((_, handle)) = self.obstacle.take() {
            surface.destroy(handle);
        }
        for (_, handle) in std::mem::take(&mut self.coins) {
            surface.destroy(handle);
        }
        for (_, handle) in std::mem::take(&mut self.segments) {
            surface.destroy(handle);
        }
        self.viewport = Vec2::ZERO;
    }
}
