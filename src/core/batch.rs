use std::path::PathBuf;

use crate::core::events::EventTable;
use crate::core::read::Recycle;
use crate::core::signal::SignalRecord;

/// One read and everything correlated with it during a single cycle.
#[derive(Debug)]
pub struct Slot<R> {
    pub read: R,
    pub reference: Option<Vec<u8>>,
    pub path: Option<PathBuf>,
    pub signal: Option<SignalRecord>,
    pub events: Option<EventTable>,
}

impl<R: Recycle> Slot<R> {
    fn new() -> Self {
        Self { read: R::blank(), reference: None, path: None, signal: None, events: None }
    }

    fn clear(&mut self) {
        self.reference = None;
        self.path = None;
        self.signal = None;
        self.events = None;
        self.read.recycle();
    }
}

impl<R> Slot<R> {
    /// Both the reference subsequence and the raw signal are attached.
    #[inline]
    pub fn is_correlated(&self) -> bool {
        self.reference.is_some() && self.signal.is_some()
    }
}

/// Fixed-capacity arena of reusable read slots.
///
/// Only the first `len()` slots are occupied; the remaining ones hold stale data and are never exposed.
/// Slots are allocated once and recycled between cycles, the arena never grows.
#[derive(Debug)]
pub struct Batch<R> {
    slots: Vec<Slot<R>>,
    count: usize,
}

impl<R: Recycle> Batch<R> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Batch capacity must be positive");
        let slots = (0..capacity).map(|_| Slot::new()).collect();
        Self { slots, count: 0 }
    }

    /// Releases per-cycle attachments of the occupied slots and recycles their reads.
    pub fn clear_cycle(&mut self) {
        for slot in &mut self.slots[..self.count] {
            slot.clear();
        }
        self.count = 0;
    }
}

impl<R> Batch<R> {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    #[inline]
    pub fn occupied(&self) -> &[Slot<R>] {
        &self.slots[..self.count]
    }

    #[inline]
    pub fn occupied_mut(&mut self) -> &mut [Slot<R>] {
        &mut self.slots[..self.count]
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }

    /// First unoccupied slot, if any.
    pub(crate) fn vacant(&mut self) -> Option<&mut Slot<R>> {
        self.slots.get_mut(self.count)
    }

    /// Marks the vacant slot as occupied.
    pub(crate) fn occupy(&mut self) {
        debug_assert!(self.count < self.slots.len());
        self.count += 1;
    }
}
