use log::debug;

use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::system::System;

/// Steps every mover through its transport cycle, in scene order.
#[derive(Debug, Default)]
pub struct MoverSystem;

impl MoverSystem {
    /// Create the transport system.
    pub fn new() -> Self {
        Self
    }
}

impl System for MoverSystem {
    fn name(&self) -> &str {
        "transport"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let transitions = ctx.scene.step_movers(ctx.rng);
        for (mover, t) in transitions {
            debug!("tick {}: mover {mover} {} -> {}", ctx.tick(), t.from, t.to);
            let description = format!("mover {mover} is now {}", t.to);
            ctx.emit(
                SimEventKind::MoverStateChanged {
                    mover,
                    from: t.from,
                    to: t.to,
                },
                description,
            );
        }
    }
}
