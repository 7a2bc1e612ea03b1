//! Task callback abstraction.

/// Capability invoked with a task's argument once the task is due.
///
/// Any `FnMut(u16) + Send` closure or function pointer is a callback via the
/// blanket implementation, so most callers never implement this by hand.
///
/// # Example
///
/// ```
/// use prometheus_delay_scheduler::core::TaskCallback;
///
/// struct Counter(u32);
///
/// impl TaskCallback for Counter {
///     fn call(&mut self, arg: u16) {
///         self.0 += u32::from(arg);
///     }
/// }
///
/// let mut counter = Counter(0);
/// counter.call(5);
/// assert_eq!(counter.0, 5);
/// ```
pub trait TaskCallback: Send + 'static {
    /// Invoke the callback with the task argument.
    fn call(&mut self, arg: u16);
}

/// Blanket implementation: any sendable `FnMut(u16)` is a callback.
impl<F> TaskCallback for F
where
    F: FnMut(u16) + Send + 'static,
{
    fn call(&mut self, arg: u16) {
        self(arg);
    }
}

/// Owned, type-erased callback stored inside a task.
pub type BoxedCallback = Box<dyn TaskCallback>;
