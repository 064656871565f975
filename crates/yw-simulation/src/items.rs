use log::debug;

use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::system::System;

/// Drops consumed items, then moves every remaining item onto its parent.
#[derive(Debug, Default)]
pub struct ItemSystem;

impl ItemSystem {
    /// Create the item bookkeeping system.
    pub fn new() -> Self {
        Self
    }
}

impl System for ItemSystem {
    fn name(&self) -> &str {
        "items"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let count = ctx.scene.purge_items();
        if count > 0 {
            debug!("tick {}: purged {count} used items", ctx.tick());
            ctx.emit(
                SimEventKind::ItemsPurged { count },
                format!("purged {count} used items"),
            );
        }
        ctx.scene.reposition_items();
    }
}
