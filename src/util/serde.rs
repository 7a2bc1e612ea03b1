//! Serializable shared types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a registered task, unique among live tasks and recycled
/// once the task is gone.
pub type TaskId = u16;

/// Callback-free snapshot of a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task identifier.
    pub id: TaskId,
    /// Argument the callback will be invoked with.
    pub argument: u16,
    /// Requested delay in milliseconds.
    pub delay_ms: u16,
    /// Registration (or last reschedule) time in milliseconds on the
    /// scheduler clock.
    pub created_at_ms: u64,
}

impl TaskInfo {
    /// Milliseconds on the scheduler clock after which the task is due,
    /// saturating at `u64::MAX`.
    pub fn due_at_ms(&self) -> u64 {
        self.created_at_ms.saturating_add(u64::from(self.delay_ms))
    }
}

impl fmt::Display for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task {}: argument {}, delay {}ms",
            self.id, self.argument, self.delay_ms
        )
    }
}
