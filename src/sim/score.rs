//! Score tracking
//!
//! The display string is rebuilt in the same call as every mutation, so the
//! HUD never shows a stale value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    value: u64,
    text: String,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self {
            value: 0,
            text: Self::format(0),
        }
    }

    fn format(value: u64) -> String {
        format!("Score: {}", value)
    }

    /// Add points (saturating, never decreases)
    pub fn add(&mut self, points: u64) {
        self.value = self.value.saturating_add(points);
        self.text = Self::format(self.value);
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Text the host displays
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}
