use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rand::Rng;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::geometry::{Point, Rect};
use crate::inventory::{Counts, Inventory};
use crate::item::{ItemArena, Parent};
use crate::motion::{Motion, Movement};
use crate::process::Process;

/// Side length of the square footprint of every mover.
pub const MOVER_SIZE: f64 = 10.0;

/// Transport state of a [`Mover`]. The states form a fixed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoverState {
    /// Collecting items from the source process.
    Loading,
    /// Heading to the target process.
    TravelingToTarget,
    /// Handing items to the target process.
    Unloading,
    /// Heading back to the source process.
    TravelingToSource,
}

impl MoverState {
    /// The state that follows this one in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Loading => Self::TravelingToTarget,
            Self::TravelingToTarget => Self::Unloading,
            Self::Unloading => Self::TravelingToSource,
            Self::TravelingToSource => Self::Loading,
        }
    }
}

impl fmt::Display for MoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::TravelingToTarget => write!(f, "traveling to target"),
            Self::Unloading => write!(f, "unloading"),
            Self::TravelingToSource => write!(f, "traveling to source"),
        }
    }
}

/// A state change made by [`Mover::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoverTransition {
    /// State before the step.
    pub from: MoverState,
    /// State after the step.
    pub to: MoverState,
}

/// A mobile transport agent bound to one source and one target process.
#[derive(Debug, Clone)]
pub struct Mover {
    id: EntityId,
    label: Arc<str>,
    rect: Rect,
    inventory: Inventory,
    source: EntityId,
    target: EntityId,
    capacity: u32,
    motion: Motion,
    state: MoverState,
}

impl Mover {
    /// Create a loading mover whose top-left corner sits at `origin`.
    pub fn new(
        id: impl Into<EntityId>,
        label: impl Into<String>,
        origin: Point,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        capacity: u32,
        motion: Motion,
    ) -> Self {
        Self {
            id: id.into(),
            label: Arc::from(label.into()),
            rect: Rect::new(origin.x, origin.y, MOVER_SIZE, MOVER_SIZE),
            inventory: Inventory::new(),
            source: source.into(),
            target: target.into(),
            capacity,
            motion,
            state: MoverState::Loading,
        }
    }

    /// Current transport state.
    pub fn state(&self) -> MoverState {
        self.state
    }

    /// Process the mover loads from.
    pub fn source(&self) -> &EntityId {
        &self.source
    }

    /// Process the mover unloads at.
    pub fn target(&self) -> &EntityId {
        &self.target
    }

    /// Number of items carried before leaving the source.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Movement behaviour.
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Items currently carried.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Advance the transport state machine by one tick.
    ///
    /// A missing source or target leaves the mover where it is.
    pub fn step<R: Rng>(
        &mut self,
        processes: &mut IndexMap<EntityId, Process>,
        items: &mut ItemArena,
        rng: &mut R,
    ) -> Option<MoverTransition> {
        let done = match self.state {
            MoverState::Loading => self.load(processes, items, rng),
            MoverState::TravelingToTarget => {
                let goal = processes.get(&self.target);
                self.travel(goal, rng)
            }
            MoverState::Unloading => self.unload(processes, items, rng),
            MoverState::TravelingToSource => {
                let goal = processes.get(&self.source);
                self.travel(goal, rng)
            }
        };

        if !done {
            return None;
        }
        let from = self.state;
        self.state = from.next();
        Some(MoverTransition {
            from,
            to: self.state,
        })
    }

    fn load<R: Rng>(
        &mut self,
        processes: &mut IndexMap<EntityId, Process>,
        items: &mut ItemArena,
        rng: &mut R,
    ) -> bool {
        let Some(source) = processes.get_mut(&self.source) else {
            return false;
        };
        let Some(category) = source.output_category().map(str::to_owned) else {
            return false;
        };

        // Never ask for more than the remaining room.
        let headroom = self.capacity.saturating_sub(self.inventory.size() as u32);
        if headroom > 0 {
            let loaded = source.get(&Counts::from([(category, headroom)]));
            items.set_parent(&loaded, &Parent::Mover(self.id.clone()), &self.rect, rng);
            self.inventory.put(loaded);
        }
        self.inventory.size() >= self.capacity as usize
    }

    fn travel<R: Rng>(&mut self, goal: Option<&Process>, rng: &mut R) -> bool {
        let Some(goal) = goal else {
            return false;
        };
        self.motion.advance(&mut self.rect, goal.center(), rng);
        goal.contains(&*self)
    }

    fn unload<R: Rng>(
        &mut self,
        processes: &mut IndexMap<EntityId, Process>,
        items: &mut ItemArena,
        rng: &mut R,
    ) -> bool {
        let Some(target) = processes.get_mut(&self.target) else {
            return false;
        };
        let cargo = self.inventory.drain_all();
        let parent = Parent::Process(target.id().clone());
        items.set_parent(&cargo, &parent, target.rect(), rng);
        target.put(cargo);
        self.inventory.is_empty()
    }
}

impl Entity for Mover {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn type_label(&self) -> &Arc<str> {
        &self.label
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Mover
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn counts(pairs: &[(&str, u32)]) -> Counts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Source at the origin, target far to the right.
    fn line() -> IndexMap<EntityId, Process> {
        let mut processes = IndexMap::new();
        let source = Process::new(
            "src",
            "mine",
            Rect::new(0.0, 0.0, 40.0, 40.0),
            1,
            Counts::new(),
            counts(&[("ore", 1)]),
        );
        let target = Process::new(
            "dst",
            "smelter",
            Rect::new(200.0, 0.0, 40.0, 40.0),
            1,
            counts(&[("ore", 1)]),
            Counts::new(),
        );
        processes.insert(source.id().clone(), source);
        processes.insert(target.id().clone(), target);
        processes
    }

    fn stock(
        processes: &mut IndexMap<EntityId, Process>,
        items: &mut ItemArena,
        rng: &mut StdRng,
        n: u32,
    ) {
        let source = processes.get_mut(&EntityId::new("src")).unwrap();
        let parent = Parent::Process(source.id().clone());
        let rect = *source.rect();
        let batch = items.spawn(&counts(&[("ore", n)]), &parent, &rect, rng);
        source.put(batch);
    }

    fn cart(capacity: u32) -> Mover {
        Mover::new(
            "m1",
            "cart",
            Point::new(20.0, 20.0),
            "src",
            "dst",
            capacity,
            Motion::new(MotionKind::Steer, 15.0),
        )
    }

    #[test]
    fn state_cycle_order() {
        let mut s = MoverState::Loading;
        let mut seen = vec![s];
        for _ in 0..4 {
            s = s.next();
            seen.push(s);
        }
        assert_eq!(
            seen,
            vec![
                MoverState::Loading,
                MoverState::TravelingToTarget,
                MoverState::Unloading,
                MoverState::TravelingToSource,
                MoverState::Loading,
            ]
        );
    }

    #[test]
    fn loading_waits_for_full_capacity() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut items = ItemArena::new();
        let mut processes = line();
        let mut m = cart(5);

        stock(&mut processes, &mut items, &mut rng, 3);
        assert_eq!(m.step(&mut processes, &mut items, &mut rng), None);
        assert_eq!(m.inventory().size(), 3);
        assert_eq!(m.state(), MoverState::Loading);

        stock(&mut processes, &mut items, &mut rng, 4);
        let t = m.step(&mut processes, &mut items, &mut rng);
        assert_eq!(
            t,
            Some(MoverTransition {
                from: MoverState::Loading,
                to: MoverState::TravelingToTarget,
            })
        );
        // Withdrawal is capped at the remaining headroom.
        assert_eq!(m.inventory().size(), 5);
        assert_eq!(processes[0].inventory().quantity("ore"), 2);
    }

    #[test]
    fn loaded_items_follow_the_mover() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut items = ItemArena::new();
        let mut processes = line();
        let mut m = cart(2);
        stock(&mut processes, &mut items, &mut rng, 2);
        m.step(&mut processes, &mut items, &mut rng);

        for id in m.inventory().iter() {
            let item = items.get(id).unwrap();
            assert_eq!(item.parent(), &Parent::Mover(EntityId::new("m1")));
            assert!(m.rect().contains_point(item.position()));
        }
    }

    #[test]
    fn full_round_trip_visits_every_state_in_order() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut items = ItemArena::new();
        let mut processes = line();
        let mut m = cart(2);
        stock(&mut processes, &mut items, &mut rng, 2);

        let mut transitions = Vec::new();
        for _ in 0..2_000 {
            if let Some(t) = m.step(&mut processes, &mut items, &mut rng) {
                transitions.push(t);
            }
            if transitions.len() == 4 {
                break;
            }
        }

        assert_eq!(transitions.len(), 4, "mover never completed a round trip");
        for t in &transitions {
            assert_eq!(t.to, t.from.next());
        }
        assert_eq!(transitions[3].to, MoverState::Loading);
        assert!(m.inventory().is_empty());
        let target = &processes[1];
        assert_eq!(target.inventory().quantity("ore"), 2);
        for id in target.inventory().iter() {
            assert_eq!(
                items.get(id).unwrap().parent(),
                &Parent::Process(EntityId::new("dst"))
            );
        }
    }

    #[test]
    fn arrival_means_target_contains_mover() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut items = ItemArena::new();
        let mut processes = line();
        let mut m = cart(1);
        stock(&mut processes, &mut items, &mut rng, 1);

        let mut arrived = false;
        for _ in 0..2_000 {
            let t = m.step(&mut processes, &mut items, &mut rng);
            if t.is_some_and(|t| t.to == MoverState::Unloading) {
                arrived = true;
                break;
            }
            assert!(m.state() != MoverState::TravelingToTarget || !processes[1].contains(&m));
        }
        assert!(arrived);
        assert!(processes[1].contains(&m));
        assert!(!processes[0].contains(&m));
    }

    #[test]
    fn source_without_output_keeps_mover_loading() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut items = ItemArena::new();
        let mut processes = line();
        let mut m = Mover::new(
            "m2",
            "cart",
            Point::new(210.0, 10.0),
            "dst",
            "src",
            1,
            Motion::new(MotionKind::Steer, 5.0),
        );
        for _ in 0..5 {
            assert_eq!(m.step(&mut processes, &mut items, &mut rng), None);
        }
        assert_eq!(m.state(), MoverState::Loading);
    }

    #[test]
    fn dangling_reference_is_inert() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut items = ItemArena::new();
        let mut processes = IndexMap::new();
        let mut m = cart(1);
        assert_eq!(m.step(&mut processes, &mut items, &mut rng), None);
        assert_eq!(m.rect().origin(), Point::new(20.0, 20.0));
    }
}
