//! Audit sink implementations.
//!
//! The scheduler reports every state change to an optional sink; the
//! in-memory sink keeps a bounded history for inspection and tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::TaskId;

/// What happened to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Task accepted into the store.
    Registered,
    /// Task was due and handed to the poller.
    Fired,
    /// Task removed before it became due.
    Removed,
    /// Task delay replaced and timer restarted.
    Rescheduled,
    /// Registration refused (store full or ids exhausted).
    Rejected,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related task identifier, absent for rejected registrations.
    pub task_id: Option<TaskId>,
    /// Action taken.
    pub action: AuditAction,
    /// Task delay at the time of the event.
    pub delay_ms: u16,
    /// Wall-clock timestamp in milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
#[derive(Debug)]
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Actions recorded so far, oldest first.
    pub fn actions(&self) -> Vec<AuditAction> {
        self.events.iter().map(|e| e.action).collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sinks shared behind a mutex keep recording while the caller holds another
/// handle for inspection.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// Helper to build an audit event stamped with a fresh id and the current
/// wall-clock time.
pub fn build_audit_event(task_id: Option<TaskId>, action: AuditAction, delay_ms: u16) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        task_id,
        action,
        delay_ms,
        created_at_ms: now_ms(),
    }
}
