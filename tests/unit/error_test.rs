//! Tests for error types

use prometheus_delay_scheduler::core::SchedulerError;
use prometheus_delay_scheduler::util::clock::ClockError;

#[test]
fn test_full_error() {
    let err = SchedulerError::Full;
    assert_eq!(format!("{}", err), "task store full");
}

#[test]
fn test_not_found_error() {
    let err = SchedulerError::NotFound(7);
    assert_eq!(format!("{}", err), "task 7 not found");
}

#[test]
fn test_pending_error() {
    let err = SchedulerError::Pending { id: 3, remaining_ms: 120 };
    assert_eq!(format!("{}", err), "task 3 pending for another 120ms");
    assert!(err.is_pending());
    assert!(!SchedulerError::Empty.is_pending());
}

#[test]
fn test_clock_error_is_transparent() {
    let err: SchedulerError = ClockError::new("before epoch").into();
    assert_eq!(format!("{}", err), "clock unavailable: before epoch");
}

#[test]
fn test_release_error() {
    let err = SchedulerError::ReleaseError(12);
    assert_eq!(format!("{}", err), "failed to release id of task 12");
}
