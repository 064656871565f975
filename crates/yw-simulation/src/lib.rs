//! Tick-based scene simulation for Yardwatch.
//!
//! A [`Simulation`] owns a [`yw_core::Scene`] together with the clock, the
//! seeded RNG, and an event log, and drives a fixed pipeline of systems once
//! per simulated second: movers, processes, item bookkeeping, then detection.

/// Tick counter and simulated wall time.
pub mod clock;
/// Seed, start time, and event history bound.
pub mod config;
/// Per-tick view handed to systems.
pub mod context;
/// Detection system: refreshes camera and ROI detections.
pub mod detection;
/// Structured events and the bounded event history.
pub mod event;
/// Item system: purges consumed items and re-anchors the rest.
pub mod items;
/// Production system: steps every process.
pub mod production;
/// The engine that owns a scene and runs the pipeline.
pub mod simulation;
/// Pipeline phase trait.
pub mod system;
/// Transport system: steps every mover.
pub mod transport;

pub use clock::SimClock;
pub use config::{DEFAULT_EVENT_LIMIT, SimConfig};
pub use context::SimContext;
pub use detection::DetectionSystem;
pub use event::{EventLog, SimEvent, SimEventKind, Tally};
pub use items::ItemSystem;
pub use production::ProcessSystem;
pub use simulation::Simulation;
pub use system::System;
pub use transport::MoverSystem;
