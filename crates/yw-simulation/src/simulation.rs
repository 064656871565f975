use log::trace;
use rand::SeedableRng;
use rand::rngs::StdRng;
use yw_core::Scene;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::detection::DetectionSystem;
use crate::event::EventLog;
use crate::items::ItemSystem;
use crate::production::ProcessSystem;
use crate::system::System;
use crate::transport::MoverSystem;

/// Drives a [`Scene`] forward one simulated second at a time.
///
/// Owns the scene, clock, RNG, event log, and systems. Every tick runs the
/// built-in pipeline (movers, processes, items, detection) followed by any
/// systems added with [`Simulation::add_system`].
pub struct Simulation {
    scene: Scene,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.clock.now())
            .field("processes", &self.scene.processes().len())
            .field("movers", &self.scene.movers().len())
            .field("items", &self.scene.items().len())
            .field("pipeline", &self.system_names())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a new simulation from an assembled scene and configuration.
    pub fn new(scene: Scene, config: SimConfig) -> Self {
        let clock = SimClock::new(config.start_time);
        let rng = StdRng::seed_from_u64(config.seed);
        let events = EventLog::keeping(config.event_limit);
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(MoverSystem::new()),
            Box::new(ProcessSystem::new()),
            Box::new(ItemSystem::new()),
            Box::new(DetectionSystem::new()),
        ];
        Self {
            scene,
            clock,
            rng,
            events,
            systems,
        }
    }

    /// Register an extra system. It runs after the built-in pipeline.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Advance the simulation by one tick (one simulated second).
    pub fn advance(&mut self) -> &Scene {
        let tick = self.clock.advance();
        let mut ctx = SimContext {
            scene: &mut self.scene,
            clock: &self.clock,
            events: &mut self.events,
            rng: &mut self.rng,
        };
        for system in &mut self.systems {
            trace!("tick {tick}: {}", system.name());
            system.tick(&mut ctx);
        }

        &self.scene
    }

    /// Simulate `n` ticks back to back.
    pub fn run(&mut self, n: u64) -> &Scene {
        for _ in 0..n {
            self.advance();
        }
        &self.scene
    }

    /// The scene as left by the last tick.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene between ticks.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Tick counter and simulated time.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Everything the systems reported so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Names of the registered systems, in run order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}
