//! Gameplay configuration
//!
//! Every tunable constant lives here so revisions of the game differ only by
//! data. Persisted separately in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;

/// How player input drives the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlScheme {
    /// Up/down arrows move the player freely within the viewport
    Vertical,
    /// Jump key launches a jump from the ground
    #[default]
    Jump,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Vertical => "Vertical",
            ControlScheme::Jump => "Jump",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vertical" | "move" => Some(ControlScheme::Vertical),
            "jump" => Some(ControlScheme::Jump),
            _ => None,
        }
    }
}

/// Inclusive range sampled uniformly by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Swap the bounds if they are reversed
    fn ordered(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self::new(self.max, self.min)
        }
    }
}

/// One parallax background layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Image key the host draws for each tile
    pub key: String,
    /// Scroll speed (pixels/second)
    pub speed: f32,
    /// Tile width in pixels (defaults to the viewport width)
    #[serde(default)]
    pub tile_width: Option<f32>,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Viewport size in pixels
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Distance from the bottom of the viewport to the player's resting center
    pub ground_offset: f32,

    // === Player ===
    pub control_scheme: ControlScheme,
    /// Fixed horizontal position of the player center
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Peak height of a jump above the ground line
    pub max_jump_height: f32,
    /// Jump progress added per tick (0.05 = 20 ticks to apex)
    pub jump_step: f32,
    /// Downward pull applied every tick (pixels/second)
    pub gravity: f32,
    /// Vertical scheme movement (pixels/tick)
    pub vertical_speed: f32,
    /// Player animation frame flip period
    pub animation_period_secs: f32,

    // === Obstacle ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Horizontal speed drawn per spawn (pixels/second)
    pub obstacle_speed: Range,
    /// Delay before the next obstacle appears (seconds)
    pub obstacle_delay_secs: Range,
    /// Hitbox size as a fraction of the sprite size
    pub obstacle_hitbox_width: f32,
    pub obstacle_hitbox_height: f32,

    // === Coins ===
    pub coin_size: f32,
    /// Coin scroll speed (pixels/second)
    pub coin_speed: f32,
    pub coin_period_secs: f32,
    /// Lowest spawn height as a fraction of the viewport height
    pub coin_min_height_ratio: f32,
    pub coin_bonus: u64,

    // === Score ===
    pub score_period_secs: f32,
    pub score_per_tick: u64,

    // === Background ===
    pub layers: Vec<LayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            viewport_width: 800.0,
            viewport_height: 600.0,
            ground_offset: 60.0,

            control_scheme: ControlScheme::Jump,
            player_x: 100.0,
            player_width: 48.0,
            player_height: 64.0,
            max_jump_height: 200.0,
            jump_step: 0.05,
            gravity: 200.0,
            vertical_speed: 5.0,
            animation_period_secs: 0.15,

            obstacle_width: 64.0,
            obstacle_height: 96.0,
            obstacle_speed: Range::new(240.0, 420.0),
            obstacle_delay_secs: Range::new(2.0, 5.0),
            obstacle_hitbox_width: 0.6,
            obstacle_hitbox_height: 0.8,

            coin_size: 32.0,
            coin_speed: 180.0,
            coin_period_secs: 1.5,
            coin_min_height_ratio: 0.2,
            coin_bonus: 25,

            score_period_secs: 1.0,
            score_per_tick: 1,

            layers: vec![
                LayerConfig {
                    key: "background_far".to_string(),
                    speed: 60.0,
                    tile_width: None,
                },
                LayerConfig {
                    key: "background_near".to_string(),
                    speed: 180.0,
                    tile_width: None,
                },
            ],
        }
    }
}

impl GameConfig {
    /// Fixed timestep derived from the tick rate
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Player center y when standing on the ground
    pub fn ground_y(&self) -> f32 {
        self.viewport_height - self.ground_offset
    }

    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Repair values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.tick_rate == 0 {
            log::warn!("tick_rate must be positive, using {}", TICK_RATE);
            self.tick_rate = TICK_RATE;
        }
        if self.jump_step.is_nan() || self.jump_step <= 0.0 {
            log::warn!("jump_step must be positive, using 0.05");
            self.jump_step = 0.05;
        }
        if self.obstacle_speed.min > self.obstacle_speed.max {
            log::warn!("obstacle_speed range reversed, swapping bounds");
        }
        self.obstacle_speed = self.obstacle_speed.ordered();
        if self.obstacle_delay_secs.min > self.obstacle_delay_secs.max {
            log::warn!("obstacle_delay_secs range reversed, swapping bounds");
        }
        self.obstacle_delay_secs = self.obstacle_delay_secs.ordered();
        self.obstacle_hitbox_width = self.obstacle_hitbox_width.clamp(0.0, 1.0);
        self.obstacle_hitbox_height = self.obstacle_hitbox_height.clamp(0.0, 1.0);
        self.coin_min_height_ratio = self.coin_min_height_ratio.clamp(0.0, 1.0);
        self.viewport_width = self.viewport_width.max(1.0);
        self.viewport_height = self.viewport_height.max(1.0);
        for layer in &mut self.layers {
            if let Some(w) = layer.tile_width {
                if w <= 0.0 {
                    log::warn!("layer {} has non-positive tile width, using viewport", layer.key);
                    layer.tile_width = None;
                }
            }
        }
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "taxman_runner_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
