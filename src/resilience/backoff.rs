//! Poll pacing with doubling delays and jitter.

use rand::Rng;
use std::time::Duration;

/// Delay schedule for repeated polls of the same condition.
///
/// The first delay equals `initial`, each later one doubles, and none exceeds
/// `ceiling`. Up to a tenth of the delay is added as jitter.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_ms: u64,
    ceiling_ms: u64,
    polls: u32,
}

impl Backoff {
    pub fn new(initial_ms: u64, ceiling_ms: u64) -> Self {
        Self {
            initial_ms,
            ceiling_ms: ceiling_ms.max(initial_ms),
            polls: 0,
        }
    }

    /// Number of delays handed out so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Delay before the next poll, without jitter.
    fn base_delay_ms(&self) -> u64 {
        let factor = 1u64.checked_shl(self.polls).unwrap_or(u64::MAX);
        self.initial_ms.saturating_mul(factor).min(self.ceiling_ms)
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.base_delay_ms();
        self.polls = self.polls.saturating_add(1);

        let spread = base / 10;
        let jitter = if spread == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=spread)
        };
        Duration::from_millis(base + jitter)
    }
}
