//! Command routing onto a scheduler.
//!
//! Lets a caller describe an operation as a value (for instance after
//! parsing it from some front end) and get a single [`Outcome`] back.
//! Commands are consumed, so no argument state outlives a call.

use std::fmt;

use crate::core::{BoxedCallback, DelayScheduler, SchedulerError, Task};
use crate::util::clock::Clock;
use crate::util::serde::TaskId;

/// One scheduler operation and its arguments.
pub enum Command {
    /// Register a callback.
    Register {
        /// Callback invoked when the task is due.
        callback: BoxedCallback,
        /// Argument handed to the callback.
        argument: u16,
        /// Delay in milliseconds.
        delay_ms: u16,
    },
    /// Fetch the next due task.
    PollDue,
    /// Drop a task before it fires.
    Remove {
        /// Task to remove.
        id: TaskId,
    },
    /// Replace a task's delay.
    Reschedule {
        /// Task to update.
        id: TaskId,
        /// New delay in milliseconds.
        delay_ms: u16,
    },
}

impl Command {
    /// Register command from any callback.
    pub fn register<F>(callback: F, argument: u16, delay_ms: u16) -> Self
    where
        F: crate::core::TaskCallback,
    {
        Self::Register {
            callback: Box::new(callback),
            argument,
            delay_ms,
        }
    }

    /// Operation name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::PollDue => "poll_due",
            Self::Remove { .. } => "remove",
            Self::Reschedule { .. } => "reschedule",
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { argument, delay_ms, .. } => f
                .debug_struct("Register")
                .field("argument", argument)
                .field("delay_ms", delay_ms)
                .finish_non_exhaustive(),
            Self::PollDue => f.write_str("PollDue"),
            Self::Remove { id } => f.debug_struct("Remove").field("id", id).finish(),
            Self::Reschedule { id, delay_ms } => f
                .debug_struct("Reschedule")
                .field("id", id)
                .field("delay_ms", delay_ms)
                .finish(),
        }
    }
}

/// Result of a dispatched [`Command`], one variant per operation.
#[derive(Debug)]
pub enum Outcome {
    /// Result of [`Command::Register`].
    Registered(Result<TaskId, SchedulerError>),
    /// Result of [`Command::PollDue`].
    Polled(Result<Task, SchedulerError>),
    /// Result of [`Command::Remove`].
    Removed(Result<(), SchedulerError>),
    /// Result of [`Command::Reschedule`].
    Rescheduled(Result<(), SchedulerError>),
}

impl Outcome {
    /// The error carried by the outcome, if any.
    pub fn error(&self) -> Option<&SchedulerError> {
        match self {
            Self::Registered(r) => r.as_ref().err(),
            Self::Polled(r) => r.as_ref().err(),
            Self::Removed(r) | Self::Rescheduled(r) => r.as_ref().err(),
        }
    }

    /// Whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.error().is_none()
    }
}

/// Run `command` against `scheduler`.
pub fn dispatch<C: Clock>(scheduler: &mut DelayScheduler<C>, command: Command) -> Outcome {
    tracing::trace!(command = command.name(), "dispatching");
    match command {
        Command::Register {
            callback,
            argument,
            delay_ms,
        } => Outcome::Registered(scheduler.register_boxed(callback, argument, delay_ms)),
        Command::PollDue => Outcome::Polled(scheduler.poll_due()),
        Command::Remove { id } => Outcome::Removed(scheduler.remove(id)),
        Command::Reschedule { id, delay_ms } => {
            Outcome::Rescheduled(scheduler.reschedule(id, delay_ms))
        }
    }
}
