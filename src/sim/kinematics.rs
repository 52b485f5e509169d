//! Player kinematics
//!
//! Jump scheme: a rising edge on the jump input launches the player. While
//! ascending, height follows `ground - max_height * progress`; a constant
//! gravity term is added every tick regardless, and the player lands once
//! it reaches the ground line again.
//!
//! Vertical scheme: up/down input moves the player directly, clamped to the
//! viewport.

use super::state::{JumpState, Player};
use crate::config::GameConfig;

/// Per-tick jump constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpParams {
    pub ground_y: f32,
    pub max_jump_height: f32,
    pub jump_step: f32,
    /// Gravity already scaled to pixels per tick
    pub gravity_per_tick: f32,
}

impl JumpParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            ground_y: config.ground_y(),
            max_jump_height: config.max_jump_height,
            jump_step: config.jump_step,
            gravity_per_tick: config.gravity * config.dt(),
        }
    }
}

/// True on the tick the input goes from released to pressed
#[inline]
pub fn rising_edge(held: bool, was_held: bool) -> bool {
    held && !was_held
}

/// Start a jump if grounded. Returns true if a jump began.
pub fn begin_jump(player: &mut Player) -> bool {
    if !player.is_grounded() {
        return false;
    }
    player.state = JumpState::Jumping;
    player.jump_progress = 0.0;
    player.jump_ticks = 0;
    true
}

/// Advance one tick of jump physics. Returns true if the player landed.
pub fn step_jump(player: &mut Player, params: &JumpParams) -> bool {
    if player.state == JumpState::Jumping && player.jump_progress < 1.0 {
        player.jump_ticks += 1;
        // Derived from the tick count so twenty 0.05 steps land exactly on 1.0
        player.jump_progress = (player.jump_ticks as f32 * params.jump_step).min(1.0);
        player.pos.y = params.ground_y - params.max_jump_height * player.jump_progress;
    }

    player.pos.y += params.gravity_per_tick;

    if player.pos.y >= params.ground_y {
        player.pos.y = params.ground_y;
        let landed = player.state == JumpState::Jumping;
        player.state = JumpState::Grounded;
        player.jump_progress = 0.0;
        player.jump_ticks = 0;
        return landed;
    }
    false
}

/// Move the player up/down by `speed` pixels and keep it on screen
pub fn step_vertical(player: &mut Player, up: bool, down: bool, speed: f32, viewport_height: f32) {
    if up {
        player.pos.y -= speed;
    }
    if down {
        player.pos.y += speed;
    }
    let half = player.size.y / 2.0;
    player.pos.y = player.pos.y.clamp(half, (viewport_height - half).max(half));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn params() -> JumpParams {
        JumpParams {
            ground_y: 540.0,
            max_jump_height: 200.0,
            jump_step: 0.05,
            gravity_per_tick: 200.0 / 60.0,
        }
    }

    fn grounded_player() -> Player {
        Player::new(Vec2::new(100.0, 540.0), Vec2::new(48.0, 64.0))
    }

    #[test]
    fn test_params_from_default_config() {
        let p = JumpParams::from_config(&GameConfig::default());
        let expected = params();
        assert_eq!(p.ground_y, expected.ground_y);
        assert_eq!(p.jump_step, expected.jump_step);
        assert!((p.gravity_per_tick - expected.gravity_per_tick).abs() < 1e-5);
    }

    #[test]
    fn test_grounded_stays_on_ground() {
        let mut player = grounded_player();
        for _ in 0..100 {
            assert!(!step_jump(&mut player, &params()));
            assert_eq!(player.pos.y, 540.0);
            assert_eq!(player.jump_progress, 0.0);
        }
    }

    #[test]
    fn test_rising_edge() {
        assert!(rising_edge(true, false));
        assert!(!rising_edge(true, true));
        assert!(!rising_edge(false, true));
        assert!(!rising_edge(false, false));
    }

    #[test]
    fn test_cannot_jump_midair() {
        let mut player = grounded_player();
        assert!(begin_jump(&mut player));
        step_jump(&mut player, &params());
        assert!(!begin_jump(&mut player));
        assert_eq!(player.jump_ticks, 1);
    }

    #[test]
    fn test_trajectory_matches_formula() {
        let p = params();
        let mut player = grounded_player();
        begin_jump(&mut player);
        for k in 1..=20 {
            step_jump(&mut player, &p);
            let progress = (k as f32 * p.jump_step).min(1.0);
            let expected = p.ground_y - p.max_jump_height * progress + p.gravity_per_tick;
            assert!(
                (player.pos.y - expected).abs() < 1e-3,
                "tick {}: y={} expected {}",
                k,
                player.pos.y,
                expected
            );
            assert_eq!(player.state, JumpState::Jumping);
        }
        assert_eq!(player.jump_progress, 1.0);
    }

    #[test]
    fn test_progress_rises_then_lands() {
        let p = params();
        let mut player = grounded_player();
        begin_jump(&mut player);
        let mut last_progress = 0.0;
        let mut landed_at = None;
        for tick in 1..=200 {
            let was_ascending = player.jump_progress < 1.0;
            if step_jump(&mut player, &p) {
                landed_at = Some(tick);
                break;
            }
            if was_ascending {
                assert!(player.jump_progress > last_progress);
            } else {
                assert_eq!(player.jump_progress, 1.0);
            }
            last_progress = player.jump_progress;
        }
        // 20 ticks up, then roughly 60 ticks of gravity back down
        let landed_at = landed_at.expect("player landed");
        assert!((78..=81).contains(&landed_at), "landed at tick {}", landed_at);
        assert!(player.is_grounded());
        assert_eq!(player.pos.y, 540.0);
        assert_eq!(player.jump_progress, 0.0);
    }

    #[test]
    fn test_vertical_movement_clamped() {
        let mut player = Player::new(Vec2::new(100.0, 300.0), Vec2::new(48.0, 64.0));
        step_vertical(&mut player, true, false, 5.0, 600.0);
        assert_eq!(player.pos.y, 295.0);
        step_vertical(&mut player, true, true, 5.0, 600.0);
        assert_eq!(player.pos.y, 295.0);
        for _ in 0..200 {
            step_vertical(&mut player, true, false, 5.0, 600.0);
        }
        assert_eq!(player.pos.y, 32.0);
        for _ in 0..200 {
            step_vertical(&mut player, false, true, 5.0, 600.0);
        }
        assert_eq!(player.pos.y, 568.0);
    }
}
