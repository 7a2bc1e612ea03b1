//! Core scheduling abstractions: id allocation, ordered task storage and the
//! scheduler facade.

pub mod audit;
pub mod callback;
pub mod error;
pub mod id_allocator;
pub mod scheduler;
pub mod task_store;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use callback::{BoxedCallback, TaskCallback};
pub use error::{AppResult, SchedulerError};
pub use id_allocator::IdAllocator;
pub use scheduler::DelayScheduler;
pub use task_store::{Task, TaskStore};
