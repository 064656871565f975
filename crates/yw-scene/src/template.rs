use indexmap::IndexSet;

use crate::layout::Layout;

/// Render a definitions skeleton for every process and mover type the
/// layout uses, ready to be filled in by hand.
pub fn template(layout: &Layout) -> String {
    let cats = layout.categorize();
    let processes: IndexSet<&str> = cats.processes.iter().map(|c| c.label()).collect();
    let movers: IndexSet<&str> = cats.movers.iter().map(|c| c.label()).collect();

    let mut out = String::from("processes:\n");
    for label in processes {
        out.push_str(&format!("  {label}:\n    input:\n    output:\n    time:\n\n"));
    }
    out.push_str("movers:\n");
    for label in movers {
        out.push_str(&format!("  {label}:\n    speed:\n    capacity:\n\n"));
    }
    out
}
