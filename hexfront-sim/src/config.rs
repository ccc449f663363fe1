//! Configuration for simulated games

/// Runner configuration
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Stop after this many rounds without a winner
    pub max_rounds: u32,
    /// Base seed; player `i` gets an opponent seeded with `seed + i`
    pub seed: u64,
    /// Safety cap on resolved actions within a single turn
    pub max_actions_per_turn: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            seed: 42,
            max_actions_per_turn: 64,
        }
    }
}

impl RunnerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}
