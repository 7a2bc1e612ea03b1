//! Fixed pool of task identifiers with LIFO recycling.
//!
//! Slots live in a flat vector and free slots are chained through their
//! `next` index, so acquire and release are both O(1) and the most recently
//! released id is the next one handed out.

use crate::core::SchedulerError;
use crate::util::serde::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Allocated,
}

#[derive(Debug, Clone, Copy)]
struct IdSlot {
    state: SlotState,
    /// Next free slot; only meaningful while this slot is free.
    next: Option<TaskId>,
}

/// Allocator for ids in `0..capacity`.
///
/// The free list is built lazily on the first acquire or release.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    capacity: usize,
    slots: Vec<IdSlot>,
    head: Option<TaskId>,
    free: usize,
    initialized: bool,
}

impl IdAllocator {
    /// Create an allocator for `capacity` ids. Ids above `TaskId::MAX` are
    /// unreachable, so the capacity is clamped to `TaskId::MAX + 1`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(usize::from(TaskId::MAX) + 1);
        Self {
            capacity,
            slots: Vec::new(),
            head: None,
            free: capacity,
            initialized: false,
        }
    }

    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        // capacity <= TaskId::MAX + 1, so every index fits in a TaskId
        self.slots = (0..self.capacity)
            .map(|i| IdSlot {
                state: SlotState::Free,
                next: (i + 1 < self.capacity).then(|| (i + 1) as TaskId),
            })
            .collect();
        self.head = (self.capacity > 0).then_some(0);
        self.free = self.capacity;
        self.initialized = true;
    }

    /// Take the id at the head of the free list.
    pub fn acquire(&mut self) -> Result<TaskId, SchedulerError> {
        self.ensure_initialized();
        let id = self.head.ok_or(SchedulerError::NoFreeId)?;
        let slot = &mut self.slots[usize::from(id)];
        self.head = slot.next.take();
        slot.state = SlotState::Allocated;
        self.free -= 1;
        Ok(id)
    }

    /// Return `id` to the pool. Releasing an id that is already free is a
    /// no-op.
    pub fn release(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        self.ensure_initialized();
        let head = self.head;
        let slot = self
            .slots
            .get_mut(usize::from(id))
            .ok_or(SchedulerError::UnknownId(id))?;
        if slot.state == SlotState::Free {
            return Ok(());
        }
        slot.next = head;
        slot.state = SlotState::Free;
        self.head = Some(id);
        self.free += 1;
        Ok(())
    }

    /// Number of ids in the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of ids currently free.
    pub fn free_count(&self) -> usize {
        self.free
    }

    /// Whether `id` is handed out.
    pub fn is_allocated(&self, id: TaskId) -> bool {
        self.slots
            .get(usize::from(id))
            .is_some_and(|slot| slot.state == SlotState::Allocated)
    }

    /// Free ids in the order they will be handed out.
    pub fn free_ids(&self) -> Vec<TaskId> {
        if !self.initialized {
            return (0..self.capacity).map(|i| i as TaskId).collect();
        }
        let mut ids = Vec::with_capacity(self.free);
        let mut cursor = self.head;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.slots[usize::from(id)].next;
        }
        ids
    }
}
