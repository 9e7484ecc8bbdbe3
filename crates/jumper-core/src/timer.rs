use serde::{Deserialize, Serialize};

/// A countdown measured in simulation ticks.
///
/// Used for timed effects such as the jetpack: the effect is live while the
/// countdown holds at least one tick and ends on the tick it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consume one tick. Returns `true` when this tick exhausted the countdown.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}
