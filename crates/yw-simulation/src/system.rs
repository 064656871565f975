use std::fmt::Debug;

use crate::context::SimContext;

/// One phase of the per-tick pipeline.
///
/// [`Simulation`](crate::Simulation) runs its systems in the order they were
/// added. A phase has no way to fail; anything it wants to report goes into
/// the event log.
pub trait System: Debug {
    /// Short name shown in logs.
    fn name(&self) -> &str;

    /// Run this phase for the current tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>);
}
