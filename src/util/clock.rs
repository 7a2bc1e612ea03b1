//! Time sources used to stamp and age scheduled tasks.
//!
//! The scheduler never reads the system time directly; it asks a [`Clock`].
//! Any implementation works as long as successive readings never go
//! backwards, since due-ness is computed as `now - created_at`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MILLIS_PER_SEC: u64 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// A point in time as whole seconds plus a sub-second nanosecond fraction,
/// measured from an epoch chosen by the clock that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    secs: u64,
    nanos: u32,
}

impl Timestamp {
    /// Build a timestamp from seconds and nanoseconds. Nanoseconds beyond one
    /// second carry into `secs`, saturating at `u64::MAX`.
    pub const fn new(secs: u64, nanos: u32) -> Self {
        Self {
            secs: secs.saturating_add((nanos / 1_000_000_000) as u64),
            nanos: nanos % 1_000_000_000,
        }
    }

    /// Build a timestamp from a millisecond count.
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            secs: millis / MILLIS_PER_SEC,
            nanos: (millis % MILLIS_PER_SEC) as u32 * NANOS_PER_MILLI,
        }
    }

    /// Whole seconds since the epoch.
    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Sub-second fraction in nanoseconds.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Whole milliseconds since the epoch; the sub-millisecond part is
    /// truncated. Readings past `u64::MAX` milliseconds saturate.
    pub const fn as_millis(&self) -> u64 {
        self.secs
            .saturating_mul(MILLIS_PER_SEC)
            .saturating_add((self.nanos / NANOS_PER_MILLI) as u64)
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero if `earlier`
    /// is actually later.
    pub const fn millis_since(&self, earlier: Self) -> u64 {
        self.as_millis().saturating_sub(earlier.as_millis())
    }
}

/// The time source failed to produce a reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clock unavailable: {reason}")]
pub struct ClockError {
    reason: String,
}

impl ClockError {
    /// Create a clock error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Why the reading failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Source of timestamps for the scheduler.
pub trait Clock {
    /// Current reading. Must be non-decreasing across calls.
    fn now(&self) -> Result<Timestamp, ClockError>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Result<Timestamp, ClockError> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Result<Timestamp, ClockError> {
        (**self).now()
    }
}

/// UTC wall clock. Fails when the system time is set before the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::new(e.to_string()))?;
        Ok(Timestamp::new(since_epoch.as_secs(), since_epoch.subsec_nanos()))
    }
}

/// Monotonic clock measured from the moment it was created. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a new monotonic clock at zero.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        let elapsed = self.origin.elapsed();
        Ok(Timestamp::new(elapsed.as_secs(), elapsed.subsec_nanos()))
    }
}

/// Clock advanced by hand. Clones share the same reading, so a test can keep
/// one handle while the scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a manual clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.millis.fetch_add(delta_ms, Ordering::AcqRel);
    }

    /// Set the reading. Values below the current reading are ignored so the
    /// clock never runs backwards.
    pub fn set(&self, millis: u64) {
        self.millis.fetch_max(millis, Ordering::AcqRel);
    }

    /// Current reading in milliseconds.
    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Timestamp, ClockError> {
        Ok(Timestamp::from_millis(self.millis()))
    }
}

/// Wall-clock milliseconds since the Unix epoch, zero if the system clock is
/// before the epoch. Used for audit records only.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
