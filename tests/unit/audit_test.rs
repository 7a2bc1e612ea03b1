//! Tests for audit sink

use prometheus_delay_scheduler::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(Some(4), AuditAction::Registered, 250);
    sink.record(event);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].task_id, Some(4));
    assert_eq!(events[0].action, AuditAction::Registered);
    assert_eq!(events[0].delay_ms, 250);
    assert!(!events[0].event_id.is_empty());
}

#[test]
fn test_zero_sized_sink_drops_events() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(None, AuditAction::Rejected, 1));
    assert!(sink.events().is_empty());
}

#[test]
fn test_audit_event_serializes() {
    let event = build_audit_event(None, AuditAction::Rejected, 9);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "rejected");
    assert!(json["task_id"].is_null());
}
