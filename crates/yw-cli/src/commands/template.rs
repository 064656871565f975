use std::fs;
use std::path::{Path, PathBuf};

use yw_scene::Layout;

pub fn run(layout_path: &Path, output: Option<&Path>, force: bool) -> Result<(), String> {
    let layout = Layout::load(layout_path).map_err(|e| e.to_string())?;
    layout.check().map_err(|e| e.to_string())?;

    let out: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| layout_path.with_extension("defs.yaml"));
    if out.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            out.display()
        ));
    }

    fs::write(&out, yw_scene::template(&layout))
        .map_err(|e| format!("cannot write {}: {e}", out.display()))?;

    println!("Wrote definitions template to {}", out.display());
    println!("  Fill in input, output and time for each process,");
    println!("  and speed and capacity for each mover.");
    Ok(())
}
