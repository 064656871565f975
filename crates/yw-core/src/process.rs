use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::geometry::Rect;
use crate::inventory::{Batch, Counts, Inventory, batch_len};
use crate::item::{ItemArena, Parent};

/// Production state of a [`Process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    /// Waiting for the required inputs.
    Idle,
    /// Counting down toward the next output.
    Producing,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Producing => write!(f, "producing"),
        }
    }
}

/// What a single [`Process::step`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessTransition {
    /// Inputs were consumed and production began.
    Started {
        /// Number of input items consumed.
        consumed: usize,
    },
    /// The countdown finished and outputs were placed in the inventory.
    Finished {
        /// Number of output items created.
        produced: usize,
    },
}

/// A stationary production node.
///
/// Consumes `required_inputs` from its inventory, waits `required_time` ticks,
/// then adds `required_outputs` to its inventory. Starvation simply leaves
/// it idle.
#[derive(Debug, Clone)]
pub struct Process {
    id: EntityId,
    label: Arc<str>,
    rect: Rect,
    inventory: Inventory,
    required_inputs: Counts,
    required_outputs: Counts,
    required_time: u32,
    current_time: u32,
    state: ProcessState,
}

impl Process {
    /// Create an idle process with an empty inventory.
    pub fn new(
        id: impl Into<EntityId>,
        label: impl Into<String>,
        rect: Rect,
        required_time: u32,
        required_inputs: Counts,
        required_outputs: Counts,
    ) -> Self {
        Self {
            id: id.into(),
            label: Arc::from(label.into()),
            rect,
            inventory: Inventory::new(),
            required_inputs,
            required_outputs,
            required_time,
            current_time: required_time,
            state: ProcessState::Idle,
        }
    }

    /// Current production state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Ticks left before the current production run completes.
    pub fn current_time(&self) -> u32 {
        self.current_time
    }

    /// Length of one production run in ticks.
    pub fn required_time(&self) -> u32 {
        self.required_time
    }

    /// Inputs consumed per run.
    pub fn required_inputs(&self) -> &Counts {
        &self.required_inputs
    }

    /// Outputs created per run.
    pub fn required_outputs(&self) -> &Counts {
        &self.required_outputs
    }

    /// The single category this process produces, if any.
    pub fn output_category(&self) -> Option<&str> {
        self.required_outputs.keys().next().map(String::as_str)
    }

    /// Items currently held.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Accept a deposit. Always succeeds; there is no capacity limit.
    pub fn put(&mut self, batch: Batch) -> bool {
        self.inventory.put(batch);
        true
    }

    /// Hand out up to the requested quantities.
    pub fn get(&mut self, request: &Counts) -> Batch {
        self.inventory.get(request)
    }

    /// Advance the production state machine by one tick.
    pub fn step<R: Rng>(&mut self, items: &mut ItemArena, rng: &mut R) -> Option<ProcessTransition> {
        match self.state {
            ProcessState::Idle => {
                if !self.inventory.check_available(&self.required_inputs) {
                    return None;
                }
                let consumed = self.inventory.get(&self.required_inputs);
                items.set_used(&consumed);
                self.state = ProcessState::Producing;
                Some(ProcessTransition::Started {
                    consumed: batch_len(&consumed),
                })
            }
            ProcessState::Producing => {
                self.current_time = self.current_time.saturating_sub(1);
                if self.current_time > 0 {
                    return None;
                }
                self.state = ProcessState::Idle;
                self.current_time = self.required_time;

                let parent = Parent::Process(self.id.clone());
                let outputs = items.spawn(&self.required_outputs, &parent, &self.rect, rng);
                let produced = batch_len(&outputs);
                self.inventory.put(outputs);
                Some(ProcessTransition::Finished { produced })
            }
        }
    }
}

impl Entity for Process {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn type_label(&self) -> &Arc<str> {
        &self.label
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Process
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }
}
