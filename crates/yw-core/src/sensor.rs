use std::sync::Arc;

use indexmap::IndexMap;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::geometry::{Point, Rect};

/// Snapshot of an entity seen by a sensor on the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Id of the detected entity.
    pub id: EntityId,
    /// Kind of the detected entity.
    pub kind: EntityKind,
    /// Type label of the detected entity, shared with the entity itself.
    pub label: Arc<str>,
    /// Footprint at detection time.
    pub rect: Rect,
}

impl Detection {
    /// Capture the current state of an entity.
    pub fn of<E: Entity + ?Sized>(entity: &E) -> Self {
        Self {
            id: entity.id().clone(),
            kind: entity.kind(),
            label: Arc::clone(entity.type_label()),
            rect: *entity.rect(),
        }
    }

    /// Top-left corner of the detected entity.
    pub fn position(&self) -> Point {
        self.rect.origin()
    }

    /// Center of the detected entity.
    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

/// Detections grouped by type label, in order of first appearance.
pub type SortedDetections<'a> = IndexMap<&'a str, Vec<&'a Detection>>;

/// A stationary sensor that classifies what lies inside its footprint.
pub trait Detector: Entity {
    /// Detections recorded by the last [`Detector::detect`] call.
    fn detections(&self) -> &[Detection];

    /// Overwrite the detection list.
    fn replace_detections(&mut self, detections: Vec<Detection>);

    /// Recompute the detection list from scratch: every candidate whose
    /// center lies inside the footprint, in candidate order.
    fn detect(&mut self, candidates: &[Detection]) -> &[Detection] {
        let area = *self.rect();
        let found = candidates
            .iter()
            .filter(|candidate| area.contains_point(candidate.center()))
            .cloned()
            .collect();
        self.replace_detections(found);
        self.detections()
    }

    /// Current detections grouped by type label. Recomputed on every call.
    fn detections_sorted(&self) -> SortedDetections<'_> {
        let mut sorted = SortedDetections::new();
        for detection in self.detections() {
            sorted
                .entry(detection.label.as_ref())
                .or_default()
                .push(detection);
        }
        sorted
    }
}

/// A camera: a field of view with optional nested regions of interest.
#[derive(Debug, Clone)]
pub struct Camera {
    id: EntityId,
    label: Arc<str>,
    rect: Rect,
    rois: Vec<EntityId>,
    detections: Vec<Detection>,
}

impl Camera {
    /// Create a camera with no ROIs.
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            label: Arc::from(label.into()),
            rect,
            rois: Vec::new(),
            detections: Vec::new(),
        }
    }

    /// Ids of the ROIs nested in this camera, in declaration order.
    pub fn rois(&self) -> &[EntityId] {
        &self.rois
    }

    /// Register a nested ROI.
    pub fn attach_roi(&mut self, roi: EntityId) {
        if !self.rois.contains(&roi) {
            self.rois.push(roi);
        }
    }
}

impl Entity for Camera {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn type_label(&self) -> &Arc<str> {
        &self.label
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Camera
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Detector for Camera {
    fn detections(&self) -> &[Detection] {
        &self.detections
    }

    fn replace_detections(&mut self, detections: Vec<Detection>) {
        self.detections = detections;
    }
}

/// A region of interest inside a camera's field of view.
#[derive(Debug, Clone)]
pub struct Roi {
    id: EntityId,
    label: Arc<str>,
    rect: Rect,
    camera: EntityId,
    detections: Vec<Detection>,
}

impl Roi {
    /// Create an ROI from a rectangle given in the camera's frame.
    ///
    /// The rectangle is translated into world coordinates here and never
    /// moves again.
    pub fn new(
        id: impl Into<EntityId>,
        label: impl Into<String>,
        camera: &Camera,
        local: Rect,
    ) -> Self {
        Self {
            id: id.into(),
            label: Arc::from(label.into()),
            rect: local.relative_to(camera.rect().origin()),
            camera: camera.id().clone(),
            detections: Vec::new(),
        }
    }

    /// The camera this ROI belongs to.
    pub fn camera(&self) -> &EntityId {
        &self.camera
    }
}

impl Entity for Roi {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn type_label(&self) -> &Arc<str> {
        &self.label
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Roi
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Detector for Roi {
    fn detections(&self) -> &[Detection] {
        &self.detections
    }

    fn replace_detections(&mut self, detections: Vec<Detection>) {
        self.detections = detections;
    }
}
