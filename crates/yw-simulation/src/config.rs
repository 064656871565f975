use chrono::{DateTime, Utc};

/// Event entries a default configuration keeps in memory.
pub const DEFAULT_EVENT_LIMIT: usize = 10_000;

/// Knobs for a [`Simulation`](crate::Simulation).
///
/// Defaults: seed 42, tick 0 at the Unix epoch, the newest
/// [`DEFAULT_EVENT_LIMIT`] events retained.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seed of the run's random generator. Equal seeds give equal runs.
    pub seed: u64,
    /// Simulated time of tick 0.
    pub start_time: DateTime<Utc>,
    /// Event entries kept in memory; `0` keeps all of them.
    pub event_limit: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            event_limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl SimConfig {
    /// Use another seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Anchor tick 0 at `start`.
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = start;
        self
    }

    /// Bound the event history.
    pub fn with_event_limit(mut self, limit: usize) -> Self {
        self.event_limit = limit;
        self
    }
}
