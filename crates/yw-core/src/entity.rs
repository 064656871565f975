use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Stable identifier of a scene object.
///
/// Processes, movers, cameras, and ROIs keep the id of the layout cell they
/// were built from. Items receive a generated `item-<serial>` id. Cloning is
/// a reference count bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Arc<str>);

impl EntityId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The kind of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A stationary production node.
    Process,
    /// A mobile transport agent.
    Mover,
    /// A unit of material.
    Item,
    /// A stationary sensor.
    Camera,
    /// A region of interest nested in a camera.
    Roi,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => write!(f, "process"),
            Self::Mover => write!(f, "mover"),
            Self::Item => write!(f, "item"),
            Self::Camera => write!(f, "camera"),
            Self::Roi => write!(f, "roi"),
        }
    }
}

/// Capability shared by everything placed in the scene.
pub trait Entity {
    /// Stable identifier.
    fn id(&self) -> &EntityId;

    /// Shared handle to the type label, e.g. `"forklift"` or `"pallet"`.
    fn type_label(&self) -> &Arc<str>;

    /// Type label as a string slice. Detections group by it.
    fn label(&self) -> &str {
        self.type_label()
    }

    /// What sort of object this is.
    fn kind(&self) -> EntityKind;

    /// Current footprint in world coordinates.
    fn rect(&self) -> &Rect;

    /// Center of the footprint.
    fn center(&self) -> Point {
        self.rect().center()
    }

    /// `true` when the other entity's center lies in this entity's footprint.
    fn contains<E: Entity + ?Sized>(&self, other: &E) -> bool
    where
        Self: Sized,
    {
        self.rect().contains_point(other.center())
    }
}
