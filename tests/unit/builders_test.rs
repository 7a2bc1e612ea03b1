//! Tests for builder modules

use std::sync::Arc;

use parking_lot::Mutex;
use prometheus_delay_scheduler::builders::{build_scheduler, SchedulerBuilder};
use prometheus_delay_scheduler::config::{ClockConfig, SchedulerConfig, SortPolicy, CAPACITY};
use prometheus_delay_scheduler::core::{AuditAction, InMemoryAuditSink, SchedulerError};
use prometheus_delay_scheduler::util::clock::ManualClock;

#[test]
fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::default();
    assert_eq!(builder.config().capacity, CAPACITY);
    let scheduler = builder.build().unwrap();
    assert_eq!(scheduler.capacity(), CAPACITY);
    assert_eq!(scheduler.free_ids(), CAPACITY);
}

#[test]
fn test_scheduler_builder_capacity_override() {
    let mut scheduler = SchedulerBuilder::default()
        .with_capacity(2)
        .build_with_clock(ManualClock::new(0))
        .unwrap();
    scheduler.register(|_: u16| {}, 0, 1).unwrap();
    scheduler.register(|_: u16| {}, 0, 1).unwrap();
    assert_eq!(scheduler.register(|_: u16| {}, 0, 1).unwrap_err(), SchedulerError::Full);
}

#[test]
fn test_scheduler_builder_rejects_invalid() {
    let err = SchedulerBuilder::default().with_capacity(0).build().unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_scheduler_builder_policy_and_audit() {
    let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(8)));
    let config = SchedulerConfig {
        capacity: 4,
        sort_policy: SortPolicy::threshold(),
        clock: ClockConfig::Monotonic,
    };
    let mut scheduler = SchedulerBuilder::new(config)
        .with_audit(Box::new(Arc::clone(&sink)))
        .build()
        .unwrap();
    assert_eq!(scheduler.store().policy(), SortPolicy::threshold());

    let id = scheduler.register(|_: u16| {}, 1, 500).unwrap();
    scheduler.remove(id).unwrap();
    assert_eq!(
        sink.lock().actions(),
        vec![AuditAction::Registered, AuditAction::Removed]
    );
}

#[test]
fn test_build_scheduler_helper() {
    let cfg = SchedulerConfig {
        capacity: 3,
        ..SchedulerConfig::default()
    };
    let scheduler = build_scheduler(&cfg).unwrap();
    assert_eq!(scheduler.capacity(), 3);
    assert!(scheduler.is_empty());
}
