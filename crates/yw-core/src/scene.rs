use indexmap::IndexMap;
use log::debug;
use rand::Rng;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{YwError, YwResult};
use crate::geometry::Rect;
use crate::item::{ItemArena, Parent};
use crate::mover::{Mover, MoverTransition};
use crate::process::{Process, ProcessTransition};
use crate::sensor::{Camera, Detection, Detector, Roi};

/// The whole simulated scene: every process, mover, sensor, and live item.
///
/// Collections keep insertion order, which fixes the order in which the
/// engine visits them each tick.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    width: f64,
    height: f64,
    processes: IndexMap<EntityId, Process>,
    movers: IndexMap<EntityId, Mover>,
    cameras: IndexMap<EntityId, Camera>,
    rois: IndexMap<EntityId, Roi>,
    items: ItemArena,
}

impl Scene {
    /// Create an empty scene of the given world size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    /// Add a process.
    pub fn add_process(&mut self, process: Process) -> YwResult<()> {
        if self.processes.contains_key(process.id()) {
            return Err(YwError::DuplicateId {
                kind: EntityKind::Process,
                id: process.id().clone(),
            });
        }
        debug!("adding process {} ({})", process.id(), process.label());
        self.processes.insert(process.id().clone(), process);
        Ok(())
    }

    /// Add a mover. Its source and target must already be in the scene.
    pub fn add_mover(&mut self, mover: Mover) -> YwResult<()> {
        if self.movers.contains_key(mover.id()) {
            return Err(YwError::DuplicateId {
                kind: EntityKind::Mover,
                id: mover.id().clone(),
            });
        }
        for endpoint in [mover.source(), mover.target()] {
            if !self.processes.contains_key(endpoint) {
                return Err(YwError::UnknownProcess {
                    mover: mover.id().clone(),
                    process: endpoint.clone(),
                });
            }
        }
        debug!(
            "adding mover {} ({}) from {} to {}",
            mover.id(),
            mover.label(),
            mover.source(),
            mover.target()
        );
        self.movers.insert(mover.id().clone(), mover);
        Ok(())
    }

    /// Add a camera.
    pub fn add_camera(&mut self, camera: Camera) -> YwResult<()> {
        if self.cameras.contains_key(camera.id()) {
            return Err(YwError::DuplicateId {
                kind: EntityKind::Camera,
                id: camera.id().clone(),
            });
        }
        self.cameras.insert(camera.id().clone(), camera);
        Ok(())
    }

    /// Add an ROI and attach it to its camera, which must already exist.
    pub fn add_roi(&mut self, roi: Roi) -> YwResult<()> {
        if self.rois.contains_key(roi.id()) {
            return Err(YwError::DuplicateId {
                kind: EntityKind::Roi,
                id: roi.id().clone(),
            });
        }
        let Some(camera) = self.cameras.get_mut(roi.camera()) else {
            return Err(YwError::UnknownCamera {
                roi: roi.id().clone(),
                camera: roi.camera().clone(),
            });
        };
        camera.attach_roi(roi.id().clone());
        debug!("adding roi {} to camera {}", roi.id(), roi.camera());
        self.rois.insert(roi.id().clone(), roi);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// World width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Processes in insertion order.
    pub fn processes(&self) -> &IndexMap<EntityId, Process> {
        &self.processes
    }

    /// Movers in insertion order.
    pub fn movers(&self) -> &IndexMap<EntityId, Mover> {
        &self.movers
    }

    /// Cameras in insertion order.
    pub fn cameras(&self) -> &IndexMap<EntityId, Camera> {
        &self.cameras
    }

    /// ROIs in insertion order.
    pub fn rois(&self) -> &IndexMap<EntityId, Roi> {
        &self.rois
    }

    /// Live items.
    pub fn items(&self) -> &ItemArena {
        &self.items
    }

    /// Look up a process.
    pub fn process(&self, id: &EntityId) -> Option<&Process> {
        self.processes.get(id)
    }

    /// Look up a process mutably, e.g. to seed its inventory.
    pub fn process_mut(&mut self, id: &EntityId) -> Option<&mut Process> {
        self.processes.get_mut(id)
    }

    /// Look up a mover.
    pub fn mover(&self, id: &EntityId) -> Option<&Mover> {
        self.movers.get(id)
    }

    /// Look up a camera.
    pub fn camera(&self, id: &EntityId) -> Option<&Camera> {
        self.cameras.get(id)
    }

    /// Look up an ROI.
    pub fn roi(&self, id: &EntityId) -> Option<&Roi> {
        self.rois.get(id)
    }

    /// The ROIs nested in a camera, in declaration order.
    pub fn rois_of<'a>(&'a self, camera: &'a Camera) -> impl Iterator<Item = &'a Roi> + 'a {
        camera.rois().iter().filter_map(|id| self.rois.get(id))
    }

    /// Spawn `count` items of `category` straight into a process inventory.
    ///
    /// Returns `false` if the process does not exist.
    pub fn seed_items<R: Rng>(
        &mut self,
        process: &EntityId,
        category: &str,
        count: u32,
        rng: &mut R,
    ) -> bool {
        let Some(target) = self.processes.get_mut(process) else {
            return false;
        };
        let counts = [(category.to_string(), count)].into_iter().collect();
        let parent = Parent::Process(process.clone());
        let batch = self.items.spawn(&counts, &parent, target.rect(), rng);
        target.put(batch);
        true
    }

    // -----------------------------------------------------------------------
    // Tick phases
    // -----------------------------------------------------------------------

    /// Step every mover in insertion order.
    pub fn step_movers<R: Rng>(&mut self, rng: &mut R) -> Vec<(EntityId, MoverTransition)> {
        let mut transitions = Vec::new();
        for (id, mover) in &mut self.movers {
            if let Some(t) = mover.step(&mut self.processes, &mut self.items, rng) {
                transitions.push((id.clone(), t));
            }
        }
        transitions
    }

    /// Step every process in insertion order.
    pub fn step_processes<R: Rng>(&mut self, rng: &mut R) -> Vec<(EntityId, ProcessTransition)> {
        let mut transitions = Vec::new();
        for (id, process) in &mut self.processes {
            if let Some(t) = process.step(&mut self.items, rng) {
                transitions.push((id.clone(), t));
            }
        }
        transitions
    }

    /// Drop consumed items from the arena. Returns how many were removed.
    pub fn purge_items(&mut self) -> usize {
        self.items.purge()
    }

    /// Move every item back onto its parent using its fixed local offset.
    pub fn reposition_items(&mut self) {
        for (_, item) in self.items.iter_mut() {
            let frame: Option<Rect> = match item.parent() {
                Parent::Process(id) => self.processes.get(id).map(|p| *p.rect()),
                Parent::Mover(id) => self.movers.get(id).map(|m| *m.rect()),
                Parent::Detached => None,
            };
            if let Some(frame) = frame {
                item.follow(&frame);
            }
        }
    }

    /// Everything a sensor can see: all movers, then all live items.
    pub fn detection_candidates(&self) -> Vec<Detection> {
        self.movers
            .values()
            .map(Detection::of)
            .chain(
                self.items
                    .iter()
                    .filter(|(_, item)| !item.is_used())
                    .map(|(_, item)| Detection::of(item)),
            )
            .collect()
    }

    /// Recompute every camera's, then every ROI's, detection list.
    ///
    /// Returns how many candidates were offered. A scene without sensors
    /// skips gathering them and returns 0.
    pub fn run_detection(&mut self) -> usize {
        if self.cameras.is_empty() && self.rois.is_empty() {
            return 0;
        }
        let candidates = self.detection_candidates();
        for camera in self.cameras.values_mut() {
            camera.detect(&candidates);
        }
        for roi in self.rois.values_mut() {
            roi.detect(&candidates);
        }
        candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::inventory::Counts;
    use crate::motion::{Motion, MotionKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn process(id: &str, x: f64) -> Process {
        Process::new(
            id,
            "press",
            Rect::new(x, 0.0, 50.0, 50.0),
            2,
            Counts::new(),
            Counts::from([("panel".to_string(), 1)]),
        )
    }

    fn mover(id: &str, source: &str, target: &str) -> Mover {
        Mover::new(
            id,
            "cart",
            Point::new(25.0, 25.0),
            source,
            target,
            1,
            Motion::new(MotionKind::Steer, 5.0),
        )
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        let err = scene.add_process(process("p1", 100.0)).unwrap_err();
        assert!(matches!(err, YwError::DuplicateId { kind: EntityKind::Process, .. }));
    }

    #[test]
    fn mover_needs_both_endpoints() {
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        let err = scene.add_mover(mover("m1", "p1", "p2")).unwrap_err();
        assert!(matches!(err, YwError::UnknownProcess { .. }));
        assert!(err.to_string().contains("\"p2\""));

        scene.add_process(process("p2", 200.0)).unwrap();
        scene.add_mover(mover("m1", "p1", "p2")).unwrap();
        assert_eq!(scene.movers().len(), 1);
    }

    #[test]
    fn roi_attaches_to_camera() {
        let mut scene = Scene::new(500.0, 500.0);
        let cam = Camera::new("c1", "dock", Rect::new(0.0, 0.0, 200.0, 200.0));
        let roi = Roi::new("r1", "bay", &cam, Rect::new(0.0, 0.0, 20.0, 20.0));

        let orphan = scene.add_roi(roi.clone()).unwrap_err();
        assert!(matches!(orphan, YwError::UnknownCamera { .. }));

        scene.add_camera(cam).unwrap();
        scene.add_roi(roi).unwrap();
        let cam = scene.camera(&EntityId::new("c1")).unwrap();
        let nested: Vec<_> = scene.rois_of(cam).map(|r| r.id().clone()).collect();
        assert_eq!(nested, vec![EntityId::new("r1")]);
    }

    #[test]
    fn candidates_list_movers_before_items() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        scene.add_process(process("p2", 200.0)).unwrap();
        scene.add_mover(mover("m1", "p1", "p2")).unwrap();
        assert!(scene.seed_items(&EntityId::new("p1"), "panel", 2, &mut rng));
        assert!(!scene.seed_items(&EntityId::new("nope"), "panel", 2, &mut rng));

        let kinds: Vec<_> = scene.detection_candidates().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Mover, EntityKind::Item, EntityKind::Item]);
    }

    #[test]
    fn camera_without_rois_sees_nothing_in_empty_area() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        scene
            .add_camera(Camera::new("far", "yard", Rect::new(400.0, 400.0, 50.0, 50.0)))
            .unwrap();
        scene
            .add_camera(Camera::new("near", "bench", Rect::new(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        scene.seed_items(&EntityId::new("p1"), "panel", 3, &mut rng);
        assert_eq!(scene.run_detection(), 3);

        let far = scene.camera(&EntityId::new("far")).unwrap();
        assert!(far.detections_sorted().is_empty());
        let near = scene.camera(&EntityId::new("near")).unwrap();
        assert_eq!(near.detections_sorted()["panel"].len(), 3);
    }

    #[test]
    fn detection_is_skipped_without_sensors() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        scene.seed_items(&EntityId::new("p1"), "panel", 500, &mut rng);
        assert_eq!(scene.run_detection(), 0);
    }

    #[test]
    fn candidates_share_labels_with_their_items() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut scene = Scene::new(500.0, 500.0);
        scene.add_process(process("p1", 0.0)).unwrap();
        scene.seed_items(&EntityId::new("p1"), "panel", 2, &mut rng);

        let candidates = scene.detection_candidates();
        let (_, item) = scene.items().iter().next().unwrap();
        assert!(candidates
            .iter()
            .all(|d| std::sync::Arc::ptr_eq(&d.label, item.type_label())));
    }
}
