use log::debug;
use yw_core::ProcessTransition;

use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::system::System;

/// Steps every process through its production cycle, in scene order.
#[derive(Debug, Default)]
pub struct ProcessSystem;

impl ProcessSystem {
    /// Create the production system.
    pub fn new() -> Self {
        Self
    }
}

impl System for ProcessSystem {
    fn name(&self) -> &str {
        "production"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let transitions = ctx.scene.step_processes(ctx.rng);
        for (process, t) in transitions {
            let (kind, description) = match t {
                ProcessTransition::Started { consumed } => (
                    SimEventKind::ProductionStarted {
                        process: process.clone(),
                        consumed,
                    },
                    format!("process {process} started, consumed {consumed}"),
                ),
                ProcessTransition::Finished { produced } => (
                    SimEventKind::ProductionFinished {
                        process: process.clone(),
                        produced,
                    },
                    format!("process {process} finished, produced {produced}"),
                ),
            };
            debug!("tick {}: {description}", ctx.tick());
            ctx.emit(kind, description);
        }
    }
}
