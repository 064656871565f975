use chrono::{DateTime, TimeDelta, Utc};

/// Tracks simulation time: a monotonic tick counter and the simulated wall
/// time it corresponds to. One tick is one second.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    start: DateTime<Utc>,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { tick: 0, start }
    }

    /// Move on one tick (one second) and return the tick now current.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Ticks simulated so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time at tick 0.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Simulated time at the current tick.
    pub fn now(&self) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(self.tick as i64)
    }

    /// Elapsed simulated seconds.
    pub fn elapsed_seconds(&self) -> u64 {
        self.tick
    }
}
