use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::agent::Agent;
use crate::config::AutomatedConfig;
use crate::game::{Board, COLS};

/// Random draws tried before falling back to a left-to-right scan.
pub const DEFAULT_ATTEMPTS: usize = 10;

/// Picks a uniformly random open column.
///
/// After `attempts` draws that all hit full columns, the leftmost open column
/// is taken instead, so the agent never returns a full column. An optional
/// thinking delay runs before each choice; it is only there for front-ends
/// that want the opponent to appear to deliberate.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
    attempts: usize,
    thinking_delay: Duration,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
            attempts: DEFAULT_ATTEMPTS,
            thinking_delay: Duration::ZERO,
        }
    }

    /// Deterministic agent for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    pub fn from_config(config: &AutomatedConfig) -> Self {
        Self::new()
            .with_attempts(config.attempts)
            .with_thinking_delay(Duration::from_millis(config.thinking_delay_ms))
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_thinking_delay(mut self, delay: Duration) -> Self {
        self.thinking_delay = delay;
        self
    }

    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_column(&mut self, board: &Board) -> Option<usize> {
        if !self.thinking_delay.is_zero() {
            thread::sleep(self.thinking_delay);
        }

        for attempt in 0..self.attempts {
            let col = self.rng.random_range(0..COLS);
            if !board.is_column_full(col) {
                debug!(col, attempt, "random column accepted");
                return Some(col);
            }
        }

        let fallback = board.open_columns().first().copied();
        debug!(
            ?fallback,
            attempts = self.attempts,
            "random draws exhausted, scanning left to right"
        );
        fallback
    }
}
