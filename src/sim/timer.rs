//! Tick-driven timers
//!
//! Timers are plain `{next_fire, period, action}` records polled once per
//! tick. Cancelling a timer removes its record; nothing fires afterwards.

use serde::{Deserialize, Serialize};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Add the interval score
    ScoreTick,
    /// Flip the player animation frame
    AnimationFlip,
    /// Spawn a coin at the right edge
    SpawnCoin,
    /// Spawn the obstacle (one-shot)
    SpawnObstacle,
}

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    id: TimerId,
    next_fire: u64,
    /// `None` for one-shot timers
    period: Option<u64>,
    action: TimerAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u32,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, next_fire: u64, period: Option<u64>, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            next_fire,
            period,
            action,
        });
        id
    }

    /// Fire `action` every `period` ticks, first at `now + period`
    pub fn schedule_repeating(&mut self, now: u64, period: u64, action: TimerAction) -> TimerId {
        let period = period.max(1);
        self.insert(now + period, Some(period), action)
    }

    /// Fire `action` once, `delay` ticks from `now`
    pub fn schedule_once(&mut self, now: u64, delay: u64, action: TimerAction) -> TimerId {
        self.insert(now + delay.max(1), None, action)
    }

    /// Remove a timer. Returns false if it was already gone.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Remove every timer. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Collect timers due at `now`, ordered by due tick then creation.
    /// Repeating timers are rescheduled, one-shot timers removed.
    pub fn poll(&mut self, now: u64) -> Vec<(TimerId, TimerAction)> {
        let mut due: Vec<(u64, TimerId, TimerAction)> = self
            .timers
            .iter()
            .filter(|t| t.next_fire <= now)
            .map(|t| (t.next_fire, t.id, t.action))
            .collect();
        due.sort_by_key(|&(at, id, _)| (at, id));

        for timer in &mut self.timers {
            if timer.next_fire <= now {
                if let Some(period) = timer.period {
                    timer.next_fire += period;
                }
            }
        }
        self.timers
            .retain(|t| t.period.is_some() || t.next_fire > now);

        due.into_iter().map(|(_, id, action)| (id, action)).collect()
    }
}
