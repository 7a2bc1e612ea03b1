//! Capacity-bounded task store ordered by delay.
//!
//! Live tasks are kept in descending order of `delay_ms`, so the task with
//! the smallest delay sits at the tail and is read in O(1). How strictly
//! that order is maintained is governed by [`SortPolicy`].

use std::fmt;

use crate::config::SortPolicy;
use crate::core::{BoxedCallback, SchedulerError};
use crate::util::clock::Timestamp;
use crate::util::serde::{TaskId, TaskInfo};

/// One pending delayed invocation.
pub struct Task {
    callback: BoxedCallback,
    argument: u16,
    delay_ms: u16,
    id: TaskId,
    created_at: Timestamp,
}

impl Task {
    /// Assemble a task. The id must come from the scheduler's allocator.
    pub fn new(
        id: TaskId,
        callback: BoxedCallback,
        argument: u16,
        delay_ms: u16,
        created_at: Timestamp,
    ) -> Self {
        Self {
            callback,
            argument,
            delay_ms,
            id,
            created_at,
        }
    }

    /// Task identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Argument passed to the callback.
    pub fn argument(&self) -> u16 {
        self.argument
    }

    /// Requested delay in milliseconds.
    pub fn delay_ms(&self) -> u16 {
        self.delay_ms
    }

    /// Time of registration or of the most recent reschedule.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Milliseconds left before the task is due at `now`, zero once due.
    pub fn remaining_ms(&self, now: Timestamp) -> u64 {
        u64::from(self.delay_ms).saturating_sub(now.millis_since(self.created_at))
    }

    /// Whether more than `delay_ms` has elapsed since `created_at`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        now.millis_since(self.created_at) > u64::from(self.delay_ms)
    }

    /// Callback-free snapshot.
    pub fn info(&self) -> TaskInfo {
        TaskInfo {
            id: self.id,
            argument: self.argument,
            delay_ms: self.delay_ms,
            created_at_ms: self.created_at.as_millis(),
        }
    }

    /// Invoke the callback with the stored argument.
    pub fn invoke(&mut self) {
        let arg = self.argument;
        self.callback.call(arg);
    }

    /// Invoke the callback and drop the task.
    pub fn fire(mut self) {
        self.invoke();
    }

    fn reschedule(&mut self, delay_ms: u16, now: Timestamp) {
        self.delay_ms = delay_ms;
        self.created_at = now;
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("argument", &self.argument)
            .field("delay_ms", &self.delay_ms)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Ordered, fixed-capacity collection of live tasks.
pub struct TaskStore {
    capacity: usize,
    policy: SortPolicy,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store holding at most `capacity` tasks.
    pub fn new(capacity: usize, policy: SortPolicy) -> Self {
        Self {
            capacity,
            policy,
            tasks: Vec::with_capacity(capacity),
        }
    }

    /// Add a task, restoring order according to the sort policy.
    pub fn insert(&mut self, task: Task) -> Result<(), SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::Full);
        }
        match self.policy {
            SortPolicy::Always => {
                let at = self.ordered_position(task.delay_ms);
                self.tasks.insert(at, task);
            }
            SortPolicy::Threshold { threshold_ms } => {
                let delay = task.delay_ms;
                self.tasks.push(task);
                let len = self.tasks.len();
                if len > 1 && delay > threshold_ms && delay > self.tasks[len - 2].delay_ms {
                    self.sort();
                }
            }
        }
        Ok(())
    }

    /// Position of the task with `id` within the live prefix.
    ///
    /// Scans from both ends toward the middle.
    pub fn find_by_id(&self, id: TaskId) -> Result<usize, SchedulerError> {
        let len = self.tasks.len();
        (0..len.div_ceil(2))
            .find_map(|i| {
                let back = len - 1 - i;
                if self.tasks[i].id == id {
                    Some(i)
                } else if self.tasks[back].id == id {
                    Some(back)
                } else {
                    None
                }
            })
            .ok_or(SchedulerError::NotFound(id))
    }

    /// Borrow the task with `id`.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.find_by_id(id).ok().map(|index| &self.tasks[index])
    }

    /// Replace a task's delay and restart its timer at `now`.
    pub fn update_delay(
        &mut self,
        id: TaskId,
        new_delay: u16,
        now: Timestamp,
    ) -> Result<(), SchedulerError> {
        let index = self.find_by_id(id)?;
        match self.policy {
            SortPolicy::Always => {
                let mut task = self.tasks.remove(index);
                task.reschedule(new_delay, now);
                let at = self.ordered_position(new_delay);
                self.tasks.insert(at, task);
            }
            SortPolicy::Threshold { .. } => {
                self.tasks[index].reschedule(new_delay, now);
                if index > 0 && new_delay > self.tasks[index - 1].delay_ms {
                    self.sort();
                }
            }
        }
        Ok(())
    }

    /// Remove and return the task with `id`.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, SchedulerError> {
        let index = self.find_by_id(id)?;
        let task = self.tasks.remove(index);
        if matches!(self.policy, SortPolicy::Threshold { .. }) && self.tasks.len() > 1 {
            self.sort();
        }
        Ok(task)
    }

    /// The task with the smallest delay.
    pub fn peek_least_delay(&self) -> Result<&Task, SchedulerError> {
        self.tasks.last().ok_or(SchedulerError::Empty)
    }

    /// Remove and return the task with the smallest delay.
    pub fn pop_least_delay(&mut self) -> Result<Task, SchedulerError> {
        self.tasks.pop().ok_or(SchedulerError::Empty)
    }

    /// Live tasks from largest to smallest delay.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Whether the live prefix is in descending delay order.
    pub fn is_ordered(&self) -> bool {
        self.tasks.windows(2).all(|w| w[0].delay_ms >= w[1].delay_ms)
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store has no live tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether the store is at capacity.
    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    /// Maximum number of live tasks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active sort policy.
    pub fn policy(&self) -> SortPolicy {
        self.policy
    }

    /// Index where a task with `delay` keeps the order. Equal delays land
    /// ahead of existing ones so older tasks stay closer to the tail.
    fn ordered_position(&self, delay: u16) -> usize {
        self.tasks.partition_point(|t| t.delay_ms > delay)
    }

    fn sort(&mut self) {
        self.tasks.sort_by(|a, b| b.delay_ms.cmp(&a.delay_ms));
    }
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("tasks", &self.tasks)
            .finish()
    }
}
