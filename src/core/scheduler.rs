//! Delayed-callback scheduler composing the id allocator, task store and a
//! clock.
//!
//! Nothing runs in the background: callers register tasks and later poll for
//! the next due one on their own cadence.

use std::fmt;

use crate::config::{SortPolicy, CAPACITY};
use crate::core::{
    build_audit_event, AuditAction, AuditSink, BoxedCallback, IdAllocator, SchedulerError, Task,
    TaskCallback, TaskStore,
};
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::{TaskId, TaskInfo};

/// Owned scheduler state. Every operation is a single synchronous step; the
/// allocator and the store always change together.
pub struct DelayScheduler<C = SystemClock> {
    store: TaskStore,
    ids: IdAllocator,
    clock: C,
    audit: Option<Box<dyn AuditSink>>,
}

impl<C: fmt::Debug> fmt::Debug for DelayScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayScheduler")
            .field("store", &self.store)
            .field("ids", &self.ids)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl DelayScheduler<SystemClock> {
    /// Scheduler with [`CAPACITY`] slots, always-sorted store and the UTC
    /// system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for DelayScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DelayScheduler<C> {
    /// Scheduler with default capacity and policy reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::with_parts(
            TaskStore::new(CAPACITY, SortPolicy::Always),
            IdAllocator::new(CAPACITY),
            clock,
        )
    }

    /// Scheduler from explicit components.
    pub fn with_parts(store: TaskStore, ids: IdAllocator, clock: C) -> Self {
        Self {
            store,
            ids,
            clock,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Register `callback` to be handed back with `argument` once `delay_ms`
    /// milliseconds have passed. Returns the task id.
    pub fn register<F>(
        &mut self,
        callback: F,
        argument: u16,
        delay_ms: u16,
    ) -> Result<TaskId, SchedulerError>
    where
        F: TaskCallback,
    {
        self.register_boxed(Box::new(callback), argument, delay_ms)
    }

    /// [`register`](Self::register) for an already boxed callback.
    pub fn register_boxed(
        &mut self,
        callback: BoxedCallback,
        argument: u16,
        delay_ms: u16,
    ) -> Result<TaskId, SchedulerError> {
        if self.store.is_full() {
            tracing::warn!(capacity = self.store.capacity(), "task store full, rejecting task");
            self.record(None, AuditAction::Rejected, delay_ms);
            return Err(SchedulerError::Full);
        }
        let now = self.clock.now()?;
        let id = match self.ids.acquire() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("no free task id, rejecting task");
                self.record(None, AuditAction::Rejected, delay_ms);
                return Err(e);
            }
        };
        let task = Task::new(id, callback, argument, delay_ms, now);
        if let Err(e) = self.store.insert(task) {
            // unreachable while the full check above holds
            self.abandon_registration(id, delay_ms)?;
            return Err(e);
        }
        tracing::debug!(id, argument, delay_ms, "task registered");
        self.record(Some(id), AuditAction::Registered, delay_ms);
        Ok(id)
    }

    /// Hand back the smallest-delay task if it is due.
    ///
    /// Only that one candidate is checked: a short task registered recently
    /// can hold back an older, longer one that is already due.
    pub fn poll_due(&mut self) -> Result<Task, SchedulerError> {
        if self.store.is_empty() {
            return Err(SchedulerError::Empty);
        }
        let now = self.clock.now()?;
        let candidate = self.store.peek_least_delay()?;
        let id = candidate.id();
        if !candidate.is_due(now) {
            return Err(SchedulerError::Pending {
                id,
                remaining_ms: candidate.remaining_ms(now).max(1),
            });
        }
        self.release_id(id)?;
        let task = self.store.pop_least_delay()?;
        tracing::debug!(id, delay_ms = task.delay_ms(), "task due");
        self.record(Some(id), AuditAction::Fired, task.delay_ms());
        Ok(task)
    }

    /// Remove the task with `id` before it fires.
    pub fn remove(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        if self.store.is_empty() {
            return Err(SchedulerError::Empty);
        }
        let task = self.store.remove(id)?;
        self.release_id(id)?;
        tracing::debug!(id, "task removed");
        self.record(Some(id), AuditAction::Removed, task.delay_ms());
        Ok(())
    }

    /// Replace the delay of task `id` and restart its timer from now.
    pub fn reschedule(&mut self, id: TaskId, new_delay_ms: u16) -> Result<(), SchedulerError> {
        if self.store.is_empty() {
            return Err(SchedulerError::Empty);
        }
        let now = self.clock.now()?;
        self.store.update_delay(id, new_delay_ms, now)?;
        tracing::debug!(id, new_delay_ms, "task rescheduled");
        self.record(Some(id), AuditAction::Rescheduled, new_delay_ms);
        Ok(())
    }

    /// Invoke every task that is due right now, stopping at the first one
    /// that is still pending. Returns how many callbacks ran.
    pub fn fire_due(&mut self) -> Result<usize, SchedulerError> {
        let mut fired = 0;
        loop {
            match self.poll_due() {
                Ok(task) => {
                    task.fire();
                    fired += 1;
                }
                Err(SchedulerError::Empty | SchedulerError::Pending { .. }) => return Ok(fired),
                Err(e) => return Err(e),
            }
        }
    }

    /// Snapshot of task `id`.
    pub fn task_info(&self, id: TaskId) -> Option<TaskInfo> {
        self.store.get(id).map(Task::info)
    }

    /// Snapshots of all live tasks, largest delay first.
    pub fn snapshot(&self) -> Vec<TaskInfo> {
        self.store.iter().map(Task::info).collect()
    }

    /// Whether a live task carries `id`.
    pub fn contains(&self, id: TaskId) -> bool {
        self.store.find_by_id(id).is_ok()
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Maximum number of live tasks.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Number of ids available for new registrations.
    pub fn free_ids(&self) -> usize {
        self.ids.free_count()
    }

    /// Read-only view of the task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Read-only view of the id allocator.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// The scheduler clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn release_id(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        self.ids.release(id).map_err(|e| {
            tracing::error!(id, error = %e, "live task id could not be released");
            SchedulerError::ReleaseError(id)
        })
    }

    /// Give back the id of a registration that never reached the store.
    fn abandon_registration(&mut self, id: TaskId, delay_ms: u16) -> Result<(), SchedulerError> {
        self.release_id(id)?;
        self.record(None, AuditAction::Rejected, delay_ms);
        Ok(())
    }

    fn record(&mut self, id: Option<TaskId>, action: AuditAction, delay_ms: u16) {
        if let Some(audit) = self.audit.as_mut() {
            audit.record(build_audit_event(id, action, delay_ms));
        }
    }
}
