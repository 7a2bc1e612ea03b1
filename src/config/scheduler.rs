//! Scheduler configuration structures.

use std::env;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::util::clock::{Clock, ClockError, MonotonicClock, SystemClock, Timestamp};

/// Default maximum number of simultaneously registered tasks.
pub const CAPACITY: usize = 50;

/// Default delay above which an insert may trigger a re-sort under
/// [`SortPolicy::Threshold`].
pub const SORT_THRESHOLD_MS: u16 = 50;

/// Environment variable overriding [`SchedulerConfig::capacity`].
pub const ENV_CAPACITY: &str = "DELAY_SCHEDULER_CAPACITY";
/// Environment variable selecting the sort policy (`always` or `threshold`).
pub const ENV_SORT_POLICY: &str = "DELAY_SCHEDULER_SORT_POLICY";
/// Environment variable setting the threshold for `threshold` sorting.
pub const ENV_SORT_THRESHOLD_MS: &str = "DELAY_SCHEDULER_SORT_THRESHOLD_MS";
/// Environment variable selecting the clock (`system` or `monotonic`).
pub const ENV_CLOCK: &str = "DELAY_SCHEDULER_CLOCK";

/// How the task store keeps its descending-delay order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Every insert and update places the task at its ordered position, so
    /// the tail is always the smallest delay.
    #[default]
    Always,
    /// Re-sort only when a new or updated delay is likely out of place:
    /// inserts above `threshold_ms` that exceed their predecessor, updates
    /// that exceed their predecessor. Cheaper for runs of short delays but
    /// may leave the tail out of order.
    Threshold {
        /// Minimum inserted delay that can trigger a re-sort.
        threshold_ms: u16,
    },
}

impl SortPolicy {
    /// Threshold policy with [`SORT_THRESHOLD_MS`].
    pub const fn threshold() -> Self {
        Self::Threshold {
            threshold_ms: SORT_THRESHOLD_MS,
        }
    }
}

/// Time source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockConfig {
    /// UTC wall clock.
    #[default]
    System,
    /// Monotonic clock started when the scheduler is built.
    Monotonic,
}

/// Clock chosen at runtime from a [`ClockConfig`].
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredClock {
    /// UTC wall clock.
    System(SystemClock),
    /// Monotonic clock.
    Monotonic(MonotonicClock),
}

impl From<ClockConfig> for ConfiguredClock {
    fn from(cfg: ClockConfig) -> Self {
        match cfg {
            ClockConfig::System => Self::System(SystemClock),
            ClockConfig::Monotonic => Self::Monotonic(MonotonicClock::new()),
        }
    }
}

impl Clock for ConfiguredClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        match self {
            Self::System(clock) => clock.now(),
            Self::Monotonic(clock) => clock.now(),
        }
    }
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum simultaneously registered tasks; also the size of the id pool.
    pub capacity: usize,
    /// Ordering strategy of the task store.
    pub sort_policy: SortPolicy,
    /// Time source.
    pub clock: ClockConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capacity: CAPACITY,
            sort_policy: SortPolicy::Always,
            clock: ClockConfig::System,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.capacity > usize::from(u16::MAX) {
            return Err(format!("capacity must not exceed {}", u16::MAX));
        }
        if let SortPolicy::Threshold { threshold_ms: 0 } = self.sort_policy {
            return Err("sort threshold must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: SchedulerConfig =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading a `.env`
    /// file first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_CAPACITY) {
            cfg.capacity = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{ENV_CAPACITY}=`{raw}` is not a count"))?;
        }

        let threshold_ms = match lookup(ENV_SORT_THRESHOLD_MS) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{ENV_SORT_THRESHOLD_MS}=`{raw}` is not a delay"))?,
            None => SORT_THRESHOLD_MS,
        };

        if let Some(raw) = lookup(ENV_SORT_POLICY) {
            cfg.sort_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "always" => SortPolicy::Always,
                "threshold" => SortPolicy::Threshold { threshold_ms },
                other => anyhow::bail!("{ENV_SORT_POLICY}=`{other}` is not a sort policy"),
            };
        }

        if let Some(raw) = lookup(ENV_CLOCK) {
            cfg.clock = match raw.trim().to_ascii_lowercase().as_str() {
                "system" => ClockConfig::System,
                "monotonic" => ClockConfig::Monotonic,
                other => anyhow::bail!("{ENV_CLOCK}=`{other}` is not a clock"),
            };
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
