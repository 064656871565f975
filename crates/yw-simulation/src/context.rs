use rand::rngs::StdRng;
use yw_core::Scene;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// What a [`System`](crate::System) gets to touch during one tick.
///
/// The clock has already been advanced, so [`SimContext::tick`] is the tick
/// being simulated.
pub struct SimContext<'a> {
    /// The world being simulated.
    pub scene: &'a mut Scene,
    /// Read-only; the engine owns advancing it.
    pub clock: &'a SimClock,
    /// Sink for [`SimContext::emit`].
    pub events: &'a mut EventLog,
    /// Every random draw of the run goes through here.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Log an event stamped with the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        let tick = self.tick();
        self.events.record(SimEvent::new(tick, kind, description));
    }

    /// The tick being simulated.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}
