//! Builder that turns a [`SchedulerConfig`] into a ready [`DelayScheduler`].

use crate::config::{ConfiguredClock, SchedulerConfig};
use crate::core::{AuditSink, DelayScheduler, IdAllocator, SchedulerError, TaskStore};
use crate::util::clock::Clock;

/// Assembles a scheduler from validated configuration.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from `config`.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, audit: None }
    }

    /// Configuration the scheduler will be built from.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Override the capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Attach an audit sink to the built scheduler.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Build with the clock named in the configuration.
    pub fn build(self) -> Result<DelayScheduler<ConfiguredClock>, SchedulerError> {
        let clock = ConfiguredClock::from(self.config.clock);
        self.build_with_clock(clock)
    }

    /// Build with a caller-supplied clock, ignoring the configured one.
    pub fn build_with_clock<C: Clock>(self, clock: C) -> Result<DelayScheduler<C>, SchedulerError> {
        self.config.validate().map_err(SchedulerError::InvalidConfig)?;

        let capacity = self.config.capacity;
        let scheduler = DelayScheduler::with_parts(
            TaskStore::new(capacity, self.config.sort_policy),
            IdAllocator::new(capacity),
            clock,
        );
        tracing::debug!(capacity, policy = ?self.config.sort_policy, "scheduler built");
        Ok(match self.audit {
            Some(audit) => scheduler.with_audit(audit),
            None => scheduler,
        })
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Build a scheduler straight from configuration.
pub fn build_scheduler(cfg: &SchedulerConfig) -> Result<DelayScheduler<ConfiguredClock>, SchedulerError> {
    SchedulerBuilder::new(cfg.clone()).build()
}
