//! Thread-safe scheduler handle and a blocking poll loop.
//!
//! The scheduler itself has no internal locking. [`SharedScheduler`] puts the
//! whole thing behind one `parking_lot::Mutex`, so every operation (and the
//! id/store pair it touches) runs inside a single critical section.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::{DelayScheduler, SchedulerError, Task, TaskCallback};
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::{TaskId, TaskInfo};

/// Cloneable handle to a scheduler guarded by a single mutex.
pub struct SharedScheduler<C = SystemClock> {
    inner: Arc<Mutex<DelayScheduler<C>>>,
}

impl<C> Clone for SharedScheduler<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedScheduler<C> {
    /// Wrap a scheduler.
    pub fn new(scheduler: DelayScheduler<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }

    /// See [`DelayScheduler::register`].
    pub fn register<F>(&self, callback: F, argument: u16, delay_ms: u16) -> Result<TaskId, SchedulerError>
    where
        F: TaskCallback,
    {
        self.inner.lock().register(callback, argument, delay_ms)
    }

    /// See [`DelayScheduler::poll_due`].
    pub fn poll_due(&self) -> Result<Task, SchedulerError> {
        self.inner.lock().poll_due()
    }

    /// See [`DelayScheduler::remove`].
    pub fn remove(&self, id: TaskId) -> Result<(), SchedulerError> {
        self.inner.lock().remove(id)
    }

    /// See [`DelayScheduler::reschedule`].
    pub fn reschedule(&self, id: TaskId, new_delay_ms: u16) -> Result<(), SchedulerError> {
        self.inner.lock().reschedule(id, new_delay_ms)
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Snapshots of all live tasks.
    pub fn snapshot(&self) -> Vec<TaskInfo> {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the scheduler.
    pub fn with<R>(&self, f: impl FnOnce(&mut DelayScheduler<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Invoke every task that is due right now. Callbacks run after the lock
    /// is released, so they may register or remove tasks themselves.
    pub fn fire_due(&self) -> Result<usize, SchedulerError> {
        let mut fired = 0;
        loop {
            // guard dropped at the end of the statement
            let polled = self.inner.lock().poll_due();
            match polled {
                Ok(task) => {
                    tracing::debug!(id = task.id(), "firing task");
                    task.fire();
                    fired += 1;
                }
                Err(SchedulerError::Empty | SchedulerError::Pending { .. }) => return Ok(fired),
                Err(e) => return Err(e),
            }
        }
    }

    /// Poll every `interval`, firing due tasks, until the scheduler is empty.
    /// Returns the number of callbacks that ran.
    pub fn run_until_idle(&self, interval: Duration) -> Result<usize, SchedulerError> {
        let mut fired = 0;
        loop {
            fired += self.fire_due()?;
            if self.is_empty() {
                tracing::debug!(fired, "scheduler idle");
                return Ok(fired);
            }
            thread::sleep(interval);
        }
    }
}
