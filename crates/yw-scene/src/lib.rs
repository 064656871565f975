//! Scene loading for Yardwatch.
//!
//! A scene is described by two files: a [`Layout`] that places processes,
//! movers, cameras, and ROIs, and [`Definitions`] that give each process and
//! mover type its behaviour. [`build_scene`] checks both and assembles a
//! [`yw_core::Scene`]; [`template`] writes a definitions skeleton for a
//! layout.

/// Layout and definitions cross-checks and scene assembly.
pub mod build;
/// Process and mover type definitions.
pub mod definitions;
/// draw.io diagram reader.
pub mod drawio;
/// Error types for scene loading.
pub mod error;
/// The diagram: labelled cells and their categorization.
pub mod layout;
/// Definitions skeleton generation.
pub mod template;

pub use build::{build_scene, check_coverage, load_scene};
pub use definitions::{Definitions, MoverDef, ProcessDef};
pub use error::{SceneError, SceneResult};
pub use layout::{Cell, Layout};
pub use template::template;
