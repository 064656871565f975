use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};
use yw_core::{Camera, Entity, EntityId, Motion, Mover, Process, Roi, Scene};

use crate::definitions::Definitions;
use crate::error::{SceneError, SceneResult};
use crate::layout::{Categorized, Cell, Layout};

/// Check that every type the layout uses has a definition.
pub fn check_coverage(layout: &Layout, defs: &Definitions) -> SceneResult<()> {
    let cats = layout.categorize();
    for cell in &cats.processes {
        if !defs.processes.contains_key(cell.label()) {
            return Err(SceneError::UndefinedProcess {
                label: cell.label().to_string(),
            });
        }
    }
    for cell in &cats.movers {
        if !defs.movers.contains_key(cell.label()) {
            return Err(SceneError::UndefinedMover {
                label: cell.label().to_string(),
            });
        }
    }
    Ok(())
}

/// Turn a checked layout and its definitions into a runnable scene.
///
/// Processes come first, then cameras, ROIs, and finally movers, which
/// start at the center of their source process.
pub fn build_scene(layout: &Layout, defs: &Definitions) -> SceneResult<Scene> {
    layout.check()?;
    check_coverage(layout, defs)?;

    let cats = layout.categorize();
    let mut scene = Scene::new(layout.width, layout.height);

    for cell in &cats.processes {
        let label = cell.label();
        let def = defs
            .processes
            .get(label)
            .ok_or_else(|| SceneError::UndefinedProcess {
                label: label.to_string(),
            })?;
        scene.add_process(Process::new(
            cell.id.as_str(),
            label,
            geometry(cell)?,
            def.time,
            def.input.clone(),
            def.output.clone(),
        ))?;
    }

    for cell in &cats.cameras {
        scene.add_camera(Camera::new(cell.id.as_str(), cell.sensor_label(), geometry(cell)?))?;
    }

    for cell in &cats.rois {
        let parent = EntityId::new(cell.parent.clone().unwrap_or_default());
        let camera = scene
            .camera(&parent)
            .ok_or_else(|| SceneError::RoiOutsideCamera {
                id: cell.id.clone(),
            })?;
        let roi = Roi::new(cell.id.as_str(), cell.sensor_label(), camera, geometry(cell)?);
        scene.add_roi(roi)?;
    }

    for cell in &cats.movers {
        let label = cell.label();
        let def = defs
            .movers
            .get(label)
            .ok_or_else(|| SceneError::UndefinedMover {
                label: label.to_string(),
            })?;
        let source = EntityId::new(cell.source.clone().unwrap_or_default());
        let target = EntityId::new(cell.target.clone().unwrap_or_default());
        let origin = scene
            .process(&source)
            .map(|p| p.center())
            .unwrap_or_default();
        scene.add_mover(Mover::new(
            cell.id.as_str(),
            label,
            origin,
            source,
            target,
            def.capacity,
            Motion::new(def.movement, def.speed),
        ))?;
    }

    warn_unsupplied(&cats, defs);
    info!(
        "built scene {}x{}: {} processes, {} movers, {} cameras, {} rois",
        scene.width(),
        scene.height(),
        scene.processes().len(),
        scene.movers().len(),
        scene.cameras().len(),
        scene.rois().len()
    );
    Ok(scene)
}

/// Load, check, and build a scene from a layout file and a definitions file.
pub fn load_scene(layout: &Path, definitions: &Path) -> SceneResult<Scene> {
    let layout = Layout::load(layout)?;
    let defs = Definitions::load(definitions)?;
    build_scene(&layout, &defs)
}

fn geometry(cell: &Cell) -> SceneResult<yw_core::Rect> {
    cell.rect().ok_or_else(|| SceneError::MissingGeometry {
        id: cell.id.clone(),
    })
}

/// A process that needs inputs but that no mover delivers to will never run.
fn warn_unsupplied(cats: &Categorized<'_>, defs: &Definitions) {
    let supplied: HashSet<&str> = cats
        .movers
        .iter()
        .filter_map(|m| m.target.as_deref())
        .collect();
    for cell in &cats.processes {
        let needs_input = defs
            .processes
            .get(cell.label())
            .is_some_and(|def| !def.input.is_empty());
        if needs_input && !supplied.contains(cell.id.as_str()) {
            warn!(
                "process {} ({}) needs inputs but no mover delivers to it",
                cell.id,
                cell.label()
            );
        }
    }
}
