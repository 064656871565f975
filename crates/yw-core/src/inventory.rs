use std::collections::{BTreeMap, VecDeque};

use crate::item::ItemId;

/// Requested or available quantities, keyed by item category.
pub type Counts = BTreeMap<String, u32>;

/// Concrete items grouped by category, in FIFO order within each category.
pub type Batch = BTreeMap<String, Vec<ItemId>>;

/// Total number of items in a batch.
pub fn batch_len(batch: &Batch) -> usize {
    batch.values().map(Vec::len).sum()
}

/// Per-category quantities of a batch.
pub fn batch_counts(batch: &Batch) -> Counts {
    batch
        .iter()
        .map(|(category, items)| (category.clone(), items.len() as u32))
        .collect()
}

/// Categorized holding area of a process or mover.
///
/// Items are moved in and out by id; the arena that owns the item data lives
/// in the scene. `get` never fails: it hands back whatever is available, up
/// to the requested quantity. There is no capacity limit on `put`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: BTreeMap<String, VecDeque<ItemId>>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every item of `batch` to the back of its category.
    pub fn put(&mut self, batch: Batch) {
        for (category, items) in batch {
            self.items.entry(category).or_default().extend(items);
        }
    }

    /// Remove up to the requested quantity of each category from the front.
    pub fn get(&mut self, request: &Counts) -> Batch {
        let mut taken = Batch::new();
        for (category, &wanted) in request {
            let queue = self.items.entry(category.clone()).or_default();
            let count = queue.len().min(wanted as usize);
            taken.insert(category.clone(), queue.drain(..count).collect());
        }
        taken
    }

    /// Remove everything currently held.
    pub fn drain_all(&mut self) -> Batch {
        let available = self.available();
        self.get(&available)
    }

    /// `true` if every requested category has at least the requested quantity.
    pub fn check_available(&self, request: &Counts) -> bool {
        request
            .iter()
            .all(|(category, &wanted)| self.quantity(category) >= wanted as usize)
    }

    /// Quantity held per category.
    pub fn available(&self) -> Counts {
        self.items
            .iter()
            .map(|(category, items)| (category.clone(), items.len() as u32))
            .collect()
    }

    /// Quantity held of one category.
    pub fn quantity(&self, category: &str) -> usize {
        self.items.get(category).map_or(0, VecDeque::len)
    }

    /// Total item count across all categories.
    pub fn size(&self) -> usize {
        self.items.values().map(VecDeque::len).sum()
    }

    /// `true` if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Every held item id, category by category.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.values().flat_map(|items| items.iter().copied())
    }
}
