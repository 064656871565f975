//! Core types for Yardwatch: the scene model a simulation steps through.
//!
//! A [`Scene`] holds stationary [`Process`]es, [`Mover`]s that shuttle
//! [`Item`]s between them, and [`Camera`]s and [`Roi`]s that report what lies
//! inside their footprint. Everything here is deterministic given the random
//! generator handed in, so the engine owns all randomness.

/// Entity identifiers, kinds, and the shared [`Entity`] trait.
pub mod entity;
/// Error types raised while assembling a scene.
pub mod error;
/// Points and axis-aligned rectangles.
pub mod geometry;
/// Category-keyed FIFO item inventories.
pub mod inventory;
/// Items and the arena that owns them.
pub mod item;
/// Movement behaviours for movers.
pub mod motion;
/// Mobile transport agents.
pub mod mover;
/// Stationary production nodes.
pub mod process;
/// The scene aggregate and its tick phases.
pub mod scene;
/// Cameras, regions of interest, and detections.
pub mod sensor;

/// Re-export entity types.
pub use entity::{Entity, EntityId, EntityKind};
/// Re-export error types.
pub use error::{YwError, YwResult};
/// Re-export geometry types.
pub use geometry::{Point, Rect};
/// Re-export inventory types.
pub use inventory::{Batch, Counts, Inventory};
/// Re-export item types.
pub use item::{Item, ItemArena, ItemId, Parent};
/// Re-export movement types.
pub use motion::{Motion, MotionKind, Movement, Steering, Wander};
/// Re-export mover types.
pub use mover::{Mover, MoverState, MoverTransition};
/// Re-export process types.
pub use process::{Process, ProcessState, ProcessTransition};
/// Re-export the scene.
pub use scene::Scene;
/// Re-export sensor types.
pub use sensor::{Camera, Detection, Detector, Roi, SortedDetections};
