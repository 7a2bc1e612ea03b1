//! Tests for utility functions

use prometheus_delay_scheduler::util::{init_tracing, TaskId, TaskInfo, Timestamp};

#[test]
fn test_task_info_display() {
    let info = TaskInfo {
        id: 2,
        argument: 99,
        delay_ms: 400,
        created_at_ms: 1_000,
    };
    assert_eq!(info.to_string(), "task 2: argument 99, delay 400ms");
    assert_eq!(info.due_at_ms(), 1_400);
}

#[test]
fn test_task_info_serde() {
    let info = TaskInfo {
        id: 1,
        argument: 0,
        delay_ms: 5,
        created_at_ms: 0,
    };
    let json = serde_json::to_string(&info).unwrap();
    let back: TaskInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, info);
}

#[test]
fn test_timestamp_ordering() {
    assert!(Timestamp::new(1, 0) > Timestamp::from_millis(999));
    assert_eq!(Timestamp::new(0, 5_000_000), Timestamp::from_millis(5));
}

#[test]
fn test_task_id() {
    let id: TaskId = u16::MAX;
    assert_eq!(id, 65_535);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
