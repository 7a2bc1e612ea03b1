//! # Prometheus Delay Scheduler
//!
//! A small, in-process scheduler for delayed callbacks.
//!
//! Callers register a callback with a 16-bit argument and a delay in
//! milliseconds and get back a task id. Nothing fires on its own: the caller
//! polls the scheduler on whatever cadence suits it and receives the task with
//! the smallest delay once that delay has elapsed. Tasks can be removed or
//! rescheduled by id before they fire.
//!
//! ## Key Features
//!
//! - **Bounded**: a fixed number of live tasks (50 by default), with ids
//!   recycled from a LIFO free list
//! - **Ordered store**: tasks are kept by descending delay so the next
//!   candidate is always at the tail
//! - **Pluggable clocks**: UTC wall clock, monotonic clock, or a manual clock
//!   for deterministic tests
//! - **Drivers**: a mutex-guarded handle for threads and an optional tokio
//!   interval poller
//!
//! ```rust
//! use prometheus_delay_scheduler::core::{DelayScheduler, SchedulerError};
//! use prometheus_delay_scheduler::util::clock::ManualClock;
//!
//! let clock = ManualClock::new(0);
//! let mut scheduler = DelayScheduler::with_clock(clock.clone());
//! let id = scheduler.register(|arg: u16| println!("fired with {arg}"), 7, 400)?;
//!
//! assert!(matches!(scheduler.poll_due(), Err(SchedulerError::Pending { .. })));
//! clock.advance(401);
//! let task = scheduler.poll_due()?;
//! assert_eq!(task.id(), id);
//! task.fire();
//! # Ok::<(), SchedulerError>(())
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Id allocation, task storage and the scheduler itself.
pub mod core;
/// Configuration models and defaults.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Poll drivers and command dispatch.
pub mod runtime;
/// Shared utilities.
pub mod util;
