/// A unit of work submitted to the pool in object form.
///
/// Ownership of a submitted `Runnable` moves into the pool, which drops it
/// after execution, or without executing it if the pool shuts down first.
pub trait Runnable: Send {
    /// An optional tag used in worker log messages.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Executes the task, returning a status code.
    ///
    /// The pool logs the status and otherwise ignores it; a non-zero status
    /// does not affect the worker or other tasks.
    fn run(&mut self) -> i32;
}

/// A type-erased pending computation. The closure computes the value,
/// confines any panic, and writes the outcome into its result cell.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// A queued unit of work in either submission form.
pub(crate) enum Task {
    /// Polymorphic task object (fire-and-forget).
    Object(Box<dyn Runnable>),
    /// Captured closure bound to a result channel.
    Job(Job),
}
