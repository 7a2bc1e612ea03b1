//! Drivers around the scheduler: command dispatch, a mutex-guarded handle
//! with a blocking poll loop, and (with `tokio-runtime`) an async poller.

pub mod dispatch;
pub mod poller;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_poller;

pub use dispatch::{dispatch, Command, Outcome};
pub use poller::SharedScheduler;
#[cfg(feature = "tokio-runtime")]
pub use tokio_poller::TokioPoller;
