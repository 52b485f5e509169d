//! Coin and obstacle spawning
//!
//! All randomness is drawn from the session's seeded generator, so two
//! sessions with the same seed and inputs spawn identically.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, GameEvent, GameSession, Obstacle};
use super::timer::TimerAction;
use crate::config::{GameConfig, Range};
use crate::secs_to_ticks;

fn sample(rng: &mut impl Rng, range: Range) -> f32 {
    if range.max > range.min {
        rng.random_range(range.min..=range.max)
    } else {
        range.min
    }
}

/// Obstacle center y so its bottom lines up with the player's feet
pub fn obstacle_rest_y(config: &GameConfig, obstacle_height: f32) -> f32 {
    config.ground_y() + config.player_height / 2.0 - obstacle_height / 2.0
}

/// Vertical band coins may appear in (center y)
pub fn coin_height_band(config: &GameConfig) -> Range {
    let lo = config.viewport_height * config.coin_min_height_ratio;
    let hi = config.ground_y() - config.coin_size;
    Range::new(lo, hi.max(lo))
}

/// Create one coin at the right edge of the viewport
pub fn spawn_coin(session: &mut GameSession) -> u32 {
    let band = coin_height_band(&session.config);
    let y = sample(&mut session.rng, band);
    let x = session.config.viewport_width + session.config.coin_size / 2.0;

    let id = session.next_entity_id();
    session
        .coins
        .push(Coin::new(id, Vec2::new(x, y), session.config.coin_size));
    log::debug!("Coin {} spawned at y={:.1}", id, y);
    session.push_event(GameEvent::CoinSpawned { id });
    id
}

/// Create the obstacle at the right edge, unless one is already alive
pub fn spawn_obstacle(session: &mut GameSession) -> Option<u32> {
    if session.obstacle.is_some() {
        return None;
    }

    let config = &session.config;
    let size = Vec2::new(config.obstacle_width, config.obstacle_height);
    let pos = Vec2::new(
        config.viewport_width + size.x / 2.0,
        obstacle_rest_y(config, size.y),
    );
    let hitbox_scale = Vec2::new(config.obstacle_hitbox_width, config.obstacle_hitbox_height);
    let speed_range = config.obstacle_speed;
    let speed = sample(&mut session.rng, speed_range);

    let id = session.next_entity_id();
    session.obstacle = Some(Obstacle {
        id,
        pos,
        size,
        speed,
        hitbox_scale,
    });
    log::debug!("Obstacle {} spawned (speed {:.0})", id, speed);
    session.push_event(GameEvent::ObstacleSpawned { id, speed });
    Some(id)
}

/// Queue the next obstacle after a random delay, replacing any pending spawn
pub fn schedule_obstacle(session: &mut GameSession) {
    if let Some(pending) = session.obstacle_timer.take() {
        session.timers.cancel(pending);
    }
    let delay_secs = sample(&mut session.rng, session.config.obstacle_delay_secs);
    let delay = secs_to_ticks(delay_secs, session.config.tick_rate);
    let id = session
        .timers
        .schedule_once(session.time_ticks, delay, TimerAction::SpawnObstacle);
    session.obstacle_timer = Some(id);
    log::debug!("Next obstacle in {:.2}s", delay_secs);
}
