//! Tokio-driven poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::SchedulerError;
use crate::runtime::poller::SharedScheduler;
use crate::util::clock::Clock;

/// Polls a [`SharedScheduler`] on a fixed period from a tokio runtime.
#[derive(Clone)]
pub struct TokioPoller {
    handle: Handle,
    period: Duration,
    shutdown: Arc<watch::Sender<bool>>,
}

impl TokioPoller {
    /// Create a poller spawning onto `handle` and polling every `period`.
    pub fn new(handle: Handle, period: Duration) -> Self {
        Self {
            handle,
            period,
            shutdown: Arc::new(watch::Sender::new(false)),
        }
    }

    /// Create a poller on the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current(period: Duration) -> Self {
        Self::new(Handle::current(), period)
    }

    /// Poll period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ask running loops to stop after their current tick.
    ///
    /// Shutdown is permanent for this poller and its clones: loops spawned
    /// afterwards return `Ok(0)` without polling. Create a new poller to
    /// resume.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send_replace(true);
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Spawn a loop that fires due tasks until the scheduler is empty or
    /// [`shutdown`](Self::shutdown) is called. The handle resolves to the
    /// number of callbacks that ran.
    pub fn spawn<C>(&self, scheduler: SharedScheduler<C>) -> JoinHandle<Result<usize, SchedulerError>>
    where
        C: Clock + Send + 'static,
    {
        let period = self.period;
        let mut shutdown = self.shutdown.subscribe();
        self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut fired = 0;
            // false once the poller handle is gone and no signal can arrive
            let mut watching = true;
            loop {
                if *shutdown.borrow_and_update() {
                    tracing::info!(fired, "poller shut down");
                    return Ok(fired);
                }
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = shutdown.changed(), if watching => {
                        watching = changed.is_ok();
                        continue;
                    }
                }
                fired += scheduler.fire_due()?;
                if scheduler.is_empty() {
                    tracing::debug!(fired, "poller idle");
                    return Ok(fired);
                }
            }
        })
    }
}
