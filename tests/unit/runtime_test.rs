//! Tests for runtime drivers

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use prometheus_delay_scheduler::core::{DelayScheduler, SchedulerError};
use prometheus_delay_scheduler::runtime::{dispatch, Command, Outcome, SharedScheduler};
use prometheus_delay_scheduler::util::clock::ManualClock;

#[test]
fn test_dispatch_register_and_remove() {
    let mut scheduler = DelayScheduler::with_clock(ManualClock::new(0));
    let id = match dispatch(&mut scheduler, Command::register(|_: u16| {}, 1, 10)) {
        Outcome::Registered(Ok(id)) => id,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert!(dispatch(&mut scheduler, Command::Remove { id }).is_ok());
    let outcome = dispatch(&mut scheduler, Command::Reschedule { id, delay_ms: 5 });
    assert_eq!(outcome.error(), Some(&SchedulerError::Empty));
}

#[test]
fn test_shared_scheduler_fire_due() {
    let clock = ManualClock::new(0);
    let shared = SharedScheduler::new(DelayScheduler::with_clock(clock.clone()));
    let total = Arc::new(AtomicU32::new(0));
    for arg in [1, 2, 3] {
        let total = Arc::clone(&total);
        shared
            .register(move |a: u16| { total.fetch_add(u32::from(a), Ordering::SeqCst); }, arg, 10 * arg)
            .unwrap();
    }

    clock.advance(21);
    assert_eq!(shared.fire_due().unwrap(), 2);
    assert_eq!(total.load(Ordering::SeqCst), 3);
    assert_eq!(shared.snapshot().len(), 1);

    clock.advance(10);
    assert_eq!(shared.fire_due().unwrap(), 1);
    assert_eq!(total.load(Ordering::SeqCst), 6);
    assert!(shared.is_empty());
}

#[test]
fn test_shared_scheduler_with_access() {
    let shared = SharedScheduler::new(DelayScheduler::with_clock(ManualClock::new(0)));
    let id = shared.register(|_: u16| {}, 0, 100).unwrap();
    shared.reschedule(id, 300).unwrap();
    let delay = shared.with(|s| s.task_info(id).map(|i| i.delay_ms));
    assert_eq!(delay, Some(300));
    shared.remove(id).unwrap();
    assert_eq!(shared.poll_due().unwrap_err(), SchedulerError::Empty);
}
