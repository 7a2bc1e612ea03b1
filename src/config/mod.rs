//! Configuration models for the scheduler.

pub mod scheduler;

pub use scheduler::{
    ClockConfig, ConfiguredClock, SchedulerConfig, SortPolicy, CAPACITY, ENV_CAPACITY, ENV_CLOCK,
    ENV_SORT_POLICY, ENV_SORT_THRESHOLD_MS, SORT_THRESHOLD_MS,
};
