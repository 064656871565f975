use std::collections::{HashMap, VecDeque};

use yw_core::{EntityId, MoverState};

/// Something notable a system did during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Production
    /// Inputs were consumed and the countdown began.
    ProductionStarted {
        /// Process that started.
        process: EntityId,
        /// Items consumed.
        consumed: usize,
    },
    /// The countdown reached zero and outputs were stocked.
    ProductionFinished {
        /// Process that finished.
        process: EntityId,
        /// Items created.
        produced: usize,
    },

    // Transport
    /// A mover entered the next state of its cycle.
    MoverStateChanged {
        /// Mover that changed state.
        mover: EntityId,
        /// State it left.
        from: MoverState,
        /// State it entered.
        to: MoverState,
    },

    // Bookkeeping
    /// Consumed items were dropped from the arena.
    ItemsPurged {
        /// Items removed.
        count: usize,
    },
}

impl SimEventKind {
    /// The process or mover the event is about, if any.
    pub fn subject(&self) -> Option<&EntityId> {
        match self {
            Self::ProductionStarted { process, .. } | Self::ProductionFinished { process, .. } => {
                Some(process)
            }
            Self::MoverStateChanged { mover, .. } => Some(mover),
            Self::ItemsPurged { .. } => None,
        }
    }
}

/// One log entry.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// Tick the event happened on (the first tick is 1).
    pub tick: u64,
    /// Structured payload.
    pub kind: SimEventKind,
    /// One-line rendering for terminals and logs.
    pub description: String,
}

impl SimEvent {
    /// Build an entry.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Running totals for one process or mover, kept for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Production runs started.
    pub started: u64,
    /// Production runs finished.
    pub finished: u64,
    /// Deliveries completed (unloading done, heading back to the source).
    pub trips: u64,
}

impl Tally {
    fn count(&mut self, kind: &SimEventKind) {
        match kind {
            SimEventKind::ProductionStarted { .. } => self.started += 1,
            SimEventKind::ProductionFinished { .. } => self.finished += 1,
            SimEventKind::MoverStateChanged {
                to: MoverState::TravelingToSource,
                ..
            } => self.trips += 1,
            SimEventKind::MoverStateChanged { .. } | SimEventKind::ItemsPurged { .. } => {}
        }
    }
}

/// Event history of a run, oldest first.
///
/// With a non-zero limit only the most recent `limit` entries are retained;
/// the number of evicted entries is still counted, and per-subject
/// [`Tally`] totals cover every entry ever recorded.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<SimEvent>,
    limit: usize,
    evicted: u64,
    tallies: HashMap<EntityId, Tally>,
}

impl EventLog {
    /// An empty log retaining at most `limit` entries; `0` retains everything.
    pub fn keeping(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Append an entry, evicting from the front once over the limit.
    pub fn record(&mut self, event: SimEvent) {
        if let Some(subject) = event.kind.subject() {
            self.tallies
                .entry(subject.clone())
                .or_default()
                .count(&event.kind);
        }
        self.entries.push_back(event);
        while self.limit > 0 && self.entries.len() > self.limit {
            self.entries.pop_front();
            self.evicted += 1;
        }
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.entries.iter()
    }

    /// Retained entries recorded on `tick`.
    pub fn at_tick(&self, tick: u64) -> impl Iterator<Item = &SimEvent> {
        self.entries.iter().filter(move |e| e.tick == tick)
    }

    /// Retained entries whose subject is `id`.
    pub fn involving<'a>(&'a self, id: &'a EntityId) -> impl Iterator<Item = &'a SimEvent> {
        self.entries
            .iter()
            .filter(move |e| e.kind.subject() == Some(id))
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped because of the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Totals for `id` over the whole run, evicted entries included.
    pub fn tally(&self, id: &EntityId) -> Tally {
        self.tallies.get(id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(tick: u64, process: &str) -> SimEvent {
        SimEvent::new(
            tick,
            SimEventKind::ProductionFinished {
                process: EntityId::new(process),
                produced: 1,
            },
            format!("{process} done"),
        )
    }

    #[test]
    fn queries_filter_by_tick_and_subject() {
        let mut log = EventLog::default();
        log.record(finished(1, "press"));
        log.record(finished(1, "paint"));
        log.record(finished(2, "press"));

        assert_eq!(log.at_tick(1).count(), 2);
        assert_eq!(log.at_tick(3).count(), 0);
        let press = EntityId::new("press");
        let ticks: Vec<_> = log.involving(&press).map(|e| e.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
    }

    #[test]
    fn limit_keeps_the_newest_entries() {
        let mut log = EventLog::keeping(3);
        for tick in 1..=7 {
            log.record(finished(tick, "press"));
        }
        let ticks: Vec<_> = log.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![5, 6, 7]);
        assert_eq!(log.evicted(), 4);
    }

    #[test]
    fn tallies_outlive_eviction() {
        let mut log = EventLog::keeping(2);
        for tick in 1..=10 {
            log.record(finished(tick, "press"));
        }
        log.record(SimEvent::new(
            11,
            SimEventKind::MoverStateChanged {
                mover: EntityId::new("cart"),
                from: MoverState::Unloading,
                to: MoverState::TravelingToSource,
            },
            "cart heads back",
        ));
        log.record(SimEvent::new(
            12,
            SimEventKind::MoverStateChanged {
                mover: EntityId::new("cart"),
                from: MoverState::TravelingToSource,
                to: MoverState::Loading,
            },
            "cart loads",
        ));

        assert_eq!(log.len(), 2);
        assert_eq!(log.evicted(), 10);
        assert_eq!(log.tally(&EntityId::new("press")).finished, 10);
        assert_eq!(log.tally(&EntityId::new("cart")).trips, 1);
        assert_eq!(log.tally(&EntityId::new("nobody")), Tally::default());
    }

    #[test]
    fn zero_limit_keeps_everything() {
        let mut log = EventLog::keeping(0);
        for tick in 0..2_000 {
            log.record(SimEvent::new(tick, SimEventKind::ItemsPurged { count: 2 }, "purge"));
        }
        assert_eq!(log.len(), 2_000);
        assert_eq!(log.evicted(), 0);
    }

    #[test]
    fn purges_have_no_subject() {
        let moved = SimEventKind::MoverStateChanged {
            mover: EntityId::new("cart"),
            from: MoverState::Unloading,
            to: MoverState::TravelingToSource,
        };
        assert_eq!(moved.subject(), Some(&EntityId::new("cart")));
        assert_eq!(SimEventKind::ItemsPurged { count: 3 }.subject(), None);
    }
}
