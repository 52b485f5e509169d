//! Fixed timestep simulation tick
//!
//! Order within a tick: due timers, scrolling, collision, then player
//! kinematics. Collision is tested against already-scrolled positions.

use super::collision::{coins_touching, player_hits_obstacle};
use super::kinematics::{JumpParams, begin_jump, rising_edge, step_jump, step_vertical};
use super::scroll::scroll_world;
use super::spawn::{spawn_coin, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameSession};
use super::timer::TimerAction;
use crate::config::ControlScheme;

/// How far ahead (in seconds of obstacle travel) the autopilot jumps
const AUTOPILOT_LEAD_SECS: f32 = 0.2;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key currently held
    pub jump: bool,
    /// Up arrow held (vertical scheme)
    pub up: bool,
    /// Down arrow held (vertical scheme)
    pub down: bool,
    /// Idle/demo mode - autopilot jumps the obstacle
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput) {
    if session.phase == GamePhase::Over {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        input.jump = autopilot_wants_jump(session);
    }
    let input = &input;

    session.time_ticks += 1;

    for (_, action) in session.timers.poll(session.time_ticks) {
        fire_timer(session, action);
    }

    scroll_world(session);

    if detect_collisions(session) {
        return;
    }

    match session.config.control_scheme {
        ControlScheme::Jump => {
            if rising_edge(input.jump, session.jump_held) && begin_jump(&mut session.player) {
                log::debug!("Jump at tick {}", session.time_ticks);
                session.push_event(GameEvent::Jumped);
            }
            let params = JumpParams::from_config(&session.config);
            if step_jump(&mut session.player, &params) {
                session.push_event(GameEvent::Landed);
            }
        }
        ControlScheme::Vertical => {
            let speed = session.config.vertical_speed;
            let height = session.config.viewport_height;
            step_vertical(&mut session.player, input.up, input.down, speed, height);
        }
    }
    session.jump_held = input.jump;
}

/// Apply a timer firing. Does nothing once the session is over.
pub fn fire_timer(session: &mut GameSession, action: TimerAction) {
    if session.phase == GamePhase::Over {
        return;
    }
    match action {
        TimerAction::ScoreTick => {
            let points = session.config.score_per_tick;
            session.score.add(points);
        }
        TimerAction::AnimationFlip => {
            session.player.frame ^= 1;
        }
        TimerAction::SpawnCoin => {
            spawn_coin(session);
        }
        TimerAction::SpawnObstacle => {
            session.obstacle_timer = None;
            spawn_obstacle(session);
        }
    }
}

/// Test the player against the obstacle and coins.
/// Returns true if the session just ended.
pub fn detect_collisions(session: &mut GameSession) -> bool {
    if session.phase != GamePhase::Running {
        return false;
    }

    let hit = session
        .obstacle
        .as_ref()
        .is_some_and(|obstacle| player_hits_obstacle(&session.player, obstacle));
    if hit {
        game_over(session);
        return true;
    }

    let touched = coins_touching(&session.player, &session.coins);
    if touched.is_empty() {
        return false;
    }
    let bonus = session.config.coin_bonus;
    for &i in &touched {
        session.coins[i].alive = false;
        session.score.add(bonus);
        let id = session.coins[i].id;
        log::debug!("Coin {} collected, score {}", id, session.score.value());
        session.push_event(GameEvent::CoinCollected { id, bonus });
    }
    session.coins.retain(|c| c.alive);
    false
}

/// Running -> Over. Cancels every timer; later calls are no-ops.
pub fn game_over(session: &mut GameSession) {
    if session.phase == GamePhase::Over {
        return;
    }
    session.phase = GamePhase::Over;
    session.timers.cancel_all();
    session.obstacle_timer = None;

    let score = session.score.value();
    session.game_over_text = Some(format!("Game Over! Score: {}\nPress R to restart", score));
    log::info!("Game over at tick {} with score {}", session.time_ticks, score);
    session.push_event(GameEvent::GameOver { score });
}

/// Jump when the obstacle is about to reach the player
fn autopilot_wants_jump(session: &GameSession) -> bool {
    if !session.player.is_grounded() || session.jump_held {
        return false;
    }
    let Some(obstacle) = session.obstacle.as_ref() else {
        return false;
    };
    let player = session.player.bounds();
    let hitbox = obstacle.hitbox();
    let gap = hitbox.min.x - player.max.x;
    let lead = obstacle.speed * AUTOPILOT_LEAD_SECS;
    gap > 0.0 && gap <= lead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{Coin, JumpState, Obstacle};
    use glam::Vec2;

    /// Config with spawns pushed far out so tests control entities
    fn quiet_config() -> GameConfig {
        GameConfig {
            coin_period_secs: 10_000.0,
            obstacle_delay_secs: crate::config::Range::new(10_000.0, 10_000.0),
            ..Default::default()
        }
    }

    fn run(session: &mut GameSession, ticks: u32, input: &TickInput) {
        for _ in 0..ticks {
            tick(session, input);
        }
    }

    fn obstacle_on_player(session: &mut GameSession) {
        let id = session.next_entity_id();
        session.obstacle = Some(Obstacle {
            id,
            pos: session.player.pos,
            size: Vec2::new(64.0, 96.0),
            speed: 0.0,
            hitbox_scale: Vec2::new(0.6, 0.8),
        });
    }

    #[test]
    fn test_score_counts_seconds() {
        let mut session = GameSession::new(quiet_config(), 1);
        let idle = TickInput::default();
        for seconds in 1..=10u64 {
            run(&mut session, 60, &idle);
            assert_eq!(session.score.value(), seconds);
            assert_eq!(session.score.text(), format!("Score: {}", seconds));
        }
    }

    #[test]
    fn test_grounded_invariant_while_idle() {
        let mut session = GameSession::new(quiet_config(), 1);
        for _ in 0..300 {
            tick(&mut session, &TickInput::default());
            assert_eq!(session.player.state, JumpState::Grounded);
            assert_eq!(session.player.pos.y, session.ground_y());
            assert_eq!(session.player.jump_progress, 0.0);
        }
    }

    #[test]
    fn test_jump_trajectory_800x600() {
        let mut session = GameSession::new(quiet_config(), 1);
        let p = JumpParams::from_config(&session.config);
        let held = TickInput {
            jump: true,
            ..Default::default()
        };
        for k in 1..=20 {
            tick(&mut session, &held);
            let progress = (k as f32 * 0.05).min(1.0);
            let expected = 540.0 - 200.0 * progress + p.gravity_per_tick;
            assert!((session.player.pos.y - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_holding_jump_only_jumps_once() {
        let mut session = GameSession::new(quiet_config(), 1);
        let held = TickInput {
            jump: true,
            ..Default::default()
        };
        run(&mut session, 200, &held);
        let jumps = session
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::Jumped)
            .count();
        assert_eq!(jumps, 1);
        assert!(session.player.is_grounded());

        // Release and press again
        tick(&mut session, &TickInput::default());
        tick(&mut session, &held);
        assert_eq!(session.player.state, JumpState::Jumping);
    }

    #[test]
    fn test_coin_pickup_adds_bonus() {
        let mut session = GameSession::new(quiet_config(), 1);
        let near = session.next_entity_id();
        let far = session.next_entity_id();
        let pos = session.player.pos;
        session.coins.push(Coin::new(near, pos, 32.0));
        session.coins.push(Coin::new(far, Vec2::new(700.0, 200.0), 32.0));

        tick(&mut session, &TickInput::default());

        assert_eq!(session.score.value(), 25);
        assert_eq!(session.coins.len(), 1);
        assert_eq!(session.coins[0].id, far);
        assert_eq!(session.phase, GamePhase::Running);
        assert!(
            session
                .drain_events()
                .contains(&GameEvent::CoinCollected { id: near, bonus: 25 })
        );
    }

    #[test]
    fn test_multiple_coins_same_tick() {
        let mut session = GameSession::new(quiet_config(), 1);
        let pos = session.player.pos;
        for dx in [-10.0, 0.0, 10.0] {
            let id = session.next_entity_id();
            session.coins.push(Coin::new(id, pos + Vec2::new(dx, 0.0), 32.0));
        }
        tick(&mut session, &TickInput::default());
        assert_eq!(session.score.value(), 75);
        assert!(session.coins.is_empty());
    }

    #[test]
    fn test_obstacle_hit_ends_session_once() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        run(&mut session, 90, &TickInput::default());
        obstacle_on_player(&mut session);
        let score_before = session.score.value();

        tick(&mut session, &TickInput::default());
        assert_eq!(session.phase, GamePhase::Over);
        assert!(session.timers.is_empty());
        let text = session.game_over_text.clone().expect("final message");
        assert!(text.contains(&format!("Score: {}", score_before)));

        let overs = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Nothing moves or scores afterwards
        let frame = session.player.frame;
        let ticks = session.time_ticks;
        let coins = session.coins.len();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        run(&mut session, 600, &jump);
        for action in [
            TimerAction::ScoreTick,
            TimerAction::AnimationFlip,
            TimerAction::SpawnCoin,
            TimerAction::SpawnObstacle,
        ] {
            fire_timer(&mut session, action);
        }
        game_over(&mut session);

        assert_eq!(session.score.value(), score_before);
        assert_eq!(session.player.frame, frame);
        assert_eq!(session.time_ticks, ticks);
        assert_eq!(session.coins.len(), coins);
        assert!(session.player.is_grounded());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_obstacle_respawns_after_exit() {
        let config = GameConfig {
            obstacle_delay_secs: crate::config::Range::new(0.5, 0.5),
            obstacle_speed: crate::config::Range::new(6000.0, 6000.0),
            coin_period_secs: 10_000.0,
            ..Default::default()
        };
        let mut session = GameSession::new(config, 4);
        // Spawns at tick 30, crosses the screen in a few ticks, then reschedules
        run(&mut session, 30, &TickInput::default());
        assert!(session.obstacle.is_some());

        let mut exited = false;
        for _ in 0..20 {
            // Keep the player out of the way
            session.player.pos.y = -1000.0;
            session.player.state = JumpState::Jumping;
            session.player.jump_progress = 1.0;
            tick(&mut session, &TickInput::default());
            if session.obstacle.is_none() {
                exited = true;
                break;
            }
        }
        assert!(exited);
        assert!(session.obstacle_timer.is_some());
        assert!(
            session
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleExited { .. }))
        );
    }

    #[test]
    fn test_animation_frame_flips() {
        let mut session = GameSession::new(quiet_config(), 1);
        assert_eq!(session.player.frame, 0);
        run(&mut session, 9, &TickInput::default());
        assert_eq!(session.player.frame, 1);
        run(&mut session, 9, &TickInput::default());
        assert_eq!(session.player.frame, 0);
    }

    #[test]
    fn test_coins_spawn_on_timer() {
        let config = GameConfig {
            obstacle_delay_secs: crate::config::Range::new(10_000.0, 10_000.0),
            ..Default::default()
        };
        let mut session = GameSession::new(config, 1);
        run(&mut session, 90, &TickInput::default());
        assert_eq!(session.coins.len(), 1);
        assert!(session.coins[0].pos.x < 816.0);
    }

    #[test]
    fn test_vertical_scheme_moves_player() {
        let config = GameConfig {
            control_scheme: ControlScheme::Vertical,
            ..quiet_config()
        };
        let mut session = GameSession::new(config, 1);
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        run(&mut session, 10, &up);
        assert_eq!(session.player.pos.y, 250.0);
    }

    #[test]
    fn test_autopilot_clears_obstacles() {
        let config = GameConfig {
            coin_period_secs: 10_000.0,
            obstacle_speed: crate::config::Range::new(300.0, 300.0),
            obstacle_delay_secs: crate::config::Range::new(1.0, 2.0),
            ..Default::default()
        };
        let mut session = GameSession::new(config, 42);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        run(&mut session, 60 * 30, &idle);
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.score.value(), 30);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameSession::new(GameConfig::default(), 99999);
        let mut b = GameSession::new(GameConfig::default(), 99999);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        run(&mut a, 1200, &idle);
        run(&mut b, 1200, &idle);
        assert_eq!(a.score.value(), b.score.value());
        assert_eq!(a.coins.len(), b.coins.len());
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
