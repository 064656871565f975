use std::path::Path;

use yw_scene::{Definitions, Layout};

pub fn run(layout_path: &Path, defs_path: &Path) -> Result<(), String> {
    let layout = Layout::load(layout_path).map_err(|e| e.to_string())?;
    layout.check().map_err(|e| e.to_string())?;
    let defs = Definitions::load(defs_path).map_err(|e| e.to_string())?;
    yw_scene::check_coverage(&layout, &defs).map_err(|e| e.to_string())?;

    let cats = layout.categorize();
    println!("  All checks passed for '{}'.", layout_path.display());
    println!(
        "  {} processes, {} movers, {} cameras, {} rois",
        cats.processes.len(),
        cats.movers.len(),
        cats.cameras.len(),
        cats.rois.len()
    );
    println!(
        "  {} process types, {} mover types defined",
        defs.processes.len(),
        defs.movers.len()
    );

    Ok(())
}
