use log::trace;

use crate::context::SimContext;
use crate::system::System;

/// Refreshes every camera's and then every ROI's detection list.
///
/// Runs last so sensors see the positions left by the rest of the tick.
#[derive(Debug, Default)]
pub struct DetectionSystem;

impl DetectionSystem {
    /// Create the detection system.
    pub fn new() -> Self {
        Self
    }
}

impl System for DetectionSystem {
    fn name(&self) -> &str {
        "detection"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let offered = ctx.scene.run_detection();
        trace!("tick {}: {offered} detection candidates", ctx.tick());
    }
}
