use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use slotmap::SlotMap;

use crate::entity::{Entity, EntityId, EntityKind};
use crate::geometry::{Point, Rect};
use crate::inventory::{Batch, Counts};

slotmap::new_key_type! {
    /// Key of an item in the scene's [`ItemArena`].
    pub struct ItemId;
}

/// Side length of the square footprint of every item.
pub const ITEM_SIZE: f64 = 5.0;

/// The container an item currently sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// Held in a process inventory.
    Process(EntityId),
    /// Carried by a mover.
    Mover(EntityId),
    /// Consumed; waiting to be purged.
    Detached,
}

/// A unit of material. It has no behaviour of its own beyond following
/// its parent around.
#[derive(Debug, Clone)]
pub struct Item {
    id: EntityId,
    category: Arc<str>,
    rect: Rect,
    parent: Parent,
    local: Point,
    used: bool,
}

impl Item {
    /// Category this item belongs to (its type label).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Current container.
    pub fn parent(&self) -> &Parent {
        &self.parent
    }

    /// Offset from the parent's top-left corner, fixed until the next re-parent.
    pub fn local_offset(&self) -> Point {
        self.local
    }

    /// World position of the item's top-left corner.
    pub fn position(&self) -> Point {
        self.rect.origin()
    }

    /// `true` once the item has been consumed as a process input.
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Attach to a new parent and pick a fresh offset inside its footprint.
    pub fn reparent<R: Rng>(&mut self, parent: Parent, frame: &Rect, rng: &mut R) {
        self.parent = parent;
        self.local = Point::new(sample(rng, frame.width), sample(rng, frame.height));
        self.follow(frame);
    }

    /// Recompute the world position from the parent's footprint and the
    /// already sampled offset.
    pub fn follow(&mut self, frame: &Rect) {
        self.rect.move_to(frame.origin().offset(self.local));
    }
}

fn sample<R: Rng>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

impl Entity for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn type_label(&self) -> &Arc<str> {
        &self.category
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }
}

/// Scene-owned storage for every live item.
///
/// Inventories refer to items by [`ItemId`]; the arena owns the data. Used
/// items stay in the arena until [`ItemArena::purge`] drops them. Every item
/// of a category shares one label allocation.
#[derive(Debug, Clone, Default)]
pub struct ItemArena {
    items: SlotMap<ItemId, Item>,
    labels: HashMap<String, Arc<str>>,
    next_serial: u64,
}

impl ItemArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create items for every requested category, parented to `parent`.
    pub fn spawn<R: Rng>(
        &mut self,
        counts: &Counts,
        parent: &Parent,
        frame: &Rect,
        rng: &mut R,
    ) -> Batch {
        let mut batch = Batch::new();
        for (category, &count) in counts {
            let label = self.label_for(category);
            let ids = (0..count)
                .map(|_| {
                    self.next_serial += 1;
                    let mut item = Item {
                        id: EntityId::new(format!("item-{}", self.next_serial)),
                        category: Arc::clone(&label),
                        rect: Rect::new(0.0, 0.0, ITEM_SIZE, ITEM_SIZE),
                        parent: Parent::Detached,
                        local: Point::default(),
                        used: false,
                    };
                    item.reparent(parent.clone(), frame, rng);
                    self.items.insert(item)
                })
                .collect();
            batch.insert(category.clone(), ids);
        }
        batch
    }

    fn label_for(&mut self, category: &str) -> Arc<str> {
        if let Some(label) = self.labels.get(category) {
            return Arc::clone(label);
        }
        let label: Arc<str> = Arc::from(category);
        self.labels.insert(category.to_string(), Arc::clone(&label));
        label
    }

    /// Re-parent every item of `batch`.
    pub fn set_parent<R: Rng>(&mut self, batch: &Batch, parent: &Parent, frame: &Rect, rng: &mut R) {
        for id in batch.values().flatten() {
            if let Some(item) = self.items.get_mut(*id) {
                item.reparent(parent.clone(), frame, rng);
            }
        }
    }

    /// Mark every item of `batch` as consumed and detach it.
    pub fn set_used(&mut self, batch: &Batch) {
        for id in batch.values().flatten() {
            if let Some(item) = self.items.get_mut(*id) {
                item.used = true;
                item.parent = Parent::Detached;
            }
        }
    }

    /// Drop every used item. Returns how many were removed.
    pub fn purge(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| !item.used);
        before - self.items.len()
    }

    /// Look up an item.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up an item mutably.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    /// Iterate over live items.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter()
    }

    /// Iterate mutably over live items.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ItemId, &mut Item)> {
        self.items.iter_mut()
    }

    /// Number of items in the arena, used ones included until purged.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if the arena holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn widgets(n: u32) -> Counts {
        Counts::from([("widget".to_string(), n)])
    }

    #[test]
    fn spawn_places_items_inside_parent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut arena = ItemArena::new();
        let frame = Rect::new(100.0, 200.0, 40.0, 20.0);
        let parent = Parent::Process(EntityId::new("p1"));
        let batch = arena.spawn(&widgets(10), &parent, &frame, &mut rng);

        assert_eq!(batch["widget"].len(), 10);
        for id in &batch["widget"] {
            let item = arena.get(*id).unwrap();
            assert_eq!(item.parent(), &parent);
            let pos = item.position();
            assert!(pos.x >= 100.0 && pos.x < 140.0);
            assert!(pos.y >= 200.0 && pos.y < 220.0);
        }
    }

    #[test]
    fn spawned_items_get_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut arena = ItemArena::new();
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let batch = arena.spawn(&widgets(3), &Parent::Detached, &frame, &mut rng);
        let labels: Vec<_> = batch["widget"]
            .iter()
            .map(|id| arena.get(*id).unwrap().id().to_string())
            .collect();
        assert_eq!(labels, vec!["item-1", "item-2", "item-3"]);
    }

    #[test]
    fn items_of_a_category_share_their_label() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut arena = ItemArena::new();
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let first = arena.spawn(&widgets(1), &Parent::Detached, &frame, &mut rng);
        let second = arena.spawn(&widgets(2), &Parent::Detached, &frame, &mut rng);

        let a = arena.get(first["widget"][0]).unwrap();
        let b = arena.get(second["widget"][1]).unwrap();
        assert_eq!(a.category(), "widget");
        assert!(Arc::ptr_eq(a.type_label(), b.type_label()));
    }

    #[test]
    fn follow_keeps_offset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arena = ItemArena::new();
        let mut frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let batch = arena.spawn(&widgets(1), &Parent::Mover(EntityId::new("m")), &frame, &mut rng);
        let id = batch["widget"][0];
        let before = arena.get(id).unwrap().position();
        let offset = arena.get(id).unwrap().local_offset();

        frame.translate(Point::new(3.5, -2.0));
        arena.get_mut(id).unwrap().follow(&frame);
        let after = arena.get(id).unwrap().position();

        assert_eq!(arena.get(id).unwrap().local_offset(), offset);
        assert!((after.x - before.x - 3.5).abs() < 1e-12);
        assert!((after.y - before.y + 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_sized_parent_gives_zero_offset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arena = ItemArena::new();
        let frame = Rect::new(5.0, 6.0, 0.0, 0.0);
        let batch = arena.spawn(&widgets(1), &Parent::Detached, &frame, &mut rng);
        let item = arena.get(batch["widget"][0]).unwrap();
        assert_eq!(item.position(), Point::new(5.0, 6.0));
    }

    #[test]
    fn purge_drops_only_used_items() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut arena = ItemArena::new();
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        let parent = Parent::Process(EntityId::new("p"));
        let mut batch = arena.spawn(&widgets(4), &parent, &frame, &mut rng);
        let consumed = Batch::from([(
            "widget".to_string(),
            batch.get_mut("widget").unwrap().drain(..3).collect(),
        )]);

        arena.set_used(&consumed);
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.get(consumed["widget"][0]).unwrap().parent(), &Parent::Detached);

        assert_eq!(arena.purge(), 3);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(batch["widget"][0]).is_some());
        assert!(arena.get(consumed["widget"][0]).is_none());
        assert_eq!(arena.purge(), 0);
    }
}
