//! Error types for scheduler operations.

use thiserror::Error;

use crate::util::clock::ClockError;
use crate::util::serde::TaskId;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Task store holds its maximum number of tasks.
    #[error("task store full")]
    Full,
    /// Every identifier is allocated.
    #[error("no free task id")]
    NoFreeId,
    /// No live task carries the identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Identifier is outside the allocator's range.
    #[error("unknown task id {0}")]
    UnknownId(TaskId),
    /// The time source failed.
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// The next candidate task is not due yet.
    #[error("task {id} pending for another {remaining_ms}ms")]
    Pending {
        /// Task that was checked.
        id: TaskId,
        /// Milliseconds until the task becomes due.
        remaining_ms: u64,
    },
    /// Task store holds no tasks.
    #[error("task store empty")]
    Empty,
    /// A live task's id could not be released; the allocator and the store
    /// disagree.
    #[error("failed to release id of task {0}")]
    ReleaseError(TaskId),
    /// Configuration rejected while building a scheduler.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchedulerError {
    /// Whether this is the routine "not yet due" outcome rather than a fault.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
