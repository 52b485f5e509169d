//! Game session and core simulation types
//!
//! A `GameSession` owns everything one play-through needs: entities, the
//! timer queue, the seeded RNG and the score. The host loop owns the session
//! and hands it to `tick` by mutable reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::score::ScoreTracker;
use super::scroll::BackgroundLayer;
use super::spawn;
use super::timer::{TimerAction, TimerId, TimerQueue};
use crate::config::{ControlScheme, GameConfig};
use crate::secs_to_ticks;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Session ended; terminal
    Over,
}

/// Vertical state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Jumping,
}

/// The player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Sprite center
    pub pos: Vec2,
    pub size: Vec2,
    pub state: JumpState,
    /// Jump progress in [0, 1]
    pub jump_progress: f32,
    /// Ticks since the current jump started
    pub jump_ticks: u32,
    /// Animation frame index (0 or 1)
    pub frame: u32,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            state: JumpState::Grounded,
            jump_progress: 0.0,
            jump_ticks: 0,
            frame: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state == JumpState::Grounded
    }
}

/// The TaxMan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed (pixels/second)
    pub speed: f32,
    /// Hitbox size relative to the sprite
    pub hitbox_scale: Vec2,
}

impl Obstacle {
    /// Visible sprite bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Collision bounds (smaller than the sprite)
    pub fn hitbox(&self) -> Aabb {
        self.bounds().scaled(self.hitbox_scale)
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Coin {
    pub fn new(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinSpawned { id: u32 },
    CoinCollected { id: u32, bonus: u64 },
    CoinExpired { id: u32 },
    ObstacleSpawned { id: u32, speed: f32 },
    ObstacleExited { id: u32 },
    Jumped,
    Landed,
    GameOver { score: u64 },
}

/// One play-through, from start to the Over state
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation tick counter (the session clock)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// At most one obstacle alive
    pub obstacle: Option<Obstacle>,
    /// Alive coins in creation order
    pub coins: Vec<Coin>,
    /// Parallax layers, back to front
    pub background: Vec<BackgroundLayer>,
    pub score: ScoreTracker,
    pub timers: TimerQueue,
    /// Final message shown once the session is over
    pub game_over_text: Option<String>,
    /// Jump input as seen on the previous tick (for edge detection)
    pub(crate) jump_held: bool,
    /// Pending obstacle spawn, if one is scheduled
    pub(crate) obstacle_timer: Option<TimerId>,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameSession {
    /// Start a new session with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let start_y = match config.control_scheme {
            ControlScheme::Jump => config.ground_y(),
            ControlScheme::Vertical => config.viewport_height / 2.0,
        };
        let player = Player::new(
            Vec2::new(config.player_x, start_y),
            Vec2::new(config.player_width, config.player_height),
        );
        let background = build_layers(&config);

        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Running,
            player,
            obstacle: None,
            coins: Vec::new(),
            background,
            score: ScoreTracker::new(),
            timers: TimerQueue::new(),
            game_over_text: None,
            jump_held: false,
            obstacle_timer: None,
            events: Vec::new(),
            next_id: 1,
            config,
        };

        let rate = session.config.tick_rate;
        let now = session.time_ticks;
        session.timers.schedule_repeating(
            now,
            secs_to_ticks(session.config.score_period_secs, rate),
            TimerAction::ScoreTick,
        );
        session.timers.schedule_repeating(
            now,
            secs_to_ticks(session.config.animation_period_secs, rate),
            TimerAction::AnimationFlip,
        );
        session.timers.schedule_repeating(
            now,
            secs_to_ticks(session.config.coin_period_secs, rate),
            TimerAction::SpawnCoin,
        );
        spawn::schedule_obstacle(&mut session);

        log::info!(
            "Session started (seed {}, viewport {}x{}, scheme {})",
            seed,
            session.config.viewport_width,
            session.config.viewport_height,
            session.config.control_scheme.as_str()
        );

        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.config.ground_y()
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.config.dt()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adapt to a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.viewport_width = width.max(1.0);
        self.config.viewport_height = height.max(1.0);
        self.background = build_layers(&self.config);

        let ground = self.ground_y();
        match self.config.control_scheme {
            ControlScheme::Jump => {
                if self.player.is_grounded() || self.player.pos.y > ground {
                    self.player.pos.y = ground;
                }
            }
            ControlScheme::Vertical => {
                let half = self.player.size.y / 2.0;
                self.player.pos.y = self
                    .player
                    .pos
                    .y
                    .clamp(half, (self.config.viewport_height - half).max(half));
            }
        }
        if let Some(obstacle) = self.obstacle.as_mut() {
            obstacle.pos.y = spawn::obstacle_rest_y(&self.config, obstacle.size.y);
        }
        log::info!("Viewport resized to {}x{}", width, height);
    }
}

fn build_layers(config: &GameConfig) -> Vec<BackgroundLayer> {
    config
        .layers
        .iter()
        .map(|layer| BackgroundLayer::new(layer, config.viewport_width))
        .collect()
}
