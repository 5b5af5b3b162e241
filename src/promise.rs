use std::sync::{Arc, Condvar, Mutex};

use crate::error::{PoolError, Result};

/// What got written into the cell. `NeverRan` is produced when a task is
/// discarded by shutdown before a worker picked it up.
enum Outcome<T> {
    Value(T),
    Panicked(String),
    NeverRan,
}

/// One-shot result cell shared by a `Completer` and a `TaskHandle`. It has
/// its own lock, independent of the task queue's, so readers of unrelated
/// tasks never contend with each other or with submission.
struct Cell<T> {
    state: Mutex<Option<Outcome<T>>>,
    ready: Condvar,
}

/// The read side of a task's result channel, returned by
/// [`ThreadPool::submit`](crate::ThreadPool::submit).
pub struct TaskHandle<T> {
    cell: Arc<Cell<T>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task has produced an outcome, then returns it.
    ///
    /// Returns the computed value, [`PoolError::TaskPanicked`] if the task
    /// body panicked, or [`PoolError::TaskNeverRan`] if the pool shut down
    /// before the task was ever executed. The outcome is cached: repeated
    /// calls return the same result.
    pub fn wait(&self) -> Result<T>
    where
        T: Clone,
    {
        let mut state = self.cell.state.lock().unwrap();
        while state.is_none() {
            state = self.cell.ready.wait(state).unwrap();
        }
        match state.as_ref().unwrap() {
            Outcome::Value(value) => Ok(value.clone()),
            Outcome::Panicked(msg) => Err(PoolError::TaskPanicked(msg.clone())),
            Outcome::NeverRan => Err(PoolError::TaskNeverRan),
        }
    }

    /// Returns whether an outcome has been written, without blocking.
    pub fn is_ready(&self) -> bool {
        self.cell.state.lock().unwrap().is_some()
    }
}

/// The write side of a task's result channel. Owned by the erased job
/// closure; writes exactly once. If it is dropped without writing (the job
/// was discarded by shutdown), it resolves the cell to `NeverRan` so a
/// waiting reader gets a deterministic error instead of blocking forever.
pub(crate) struct Completer<T> {
    cell: Arc<Cell<T>>,
    done: bool,
}

impl<T> Completer<T> {
    pub(crate) fn fulfill(mut self, value: T) {
        self.set(Outcome::Value(value));
    }

    pub(crate) fn fail(mut self, panic_msg: String) {
        self.set(Outcome::Panicked(panic_msg));
    }

    fn set(&mut self, outcome: Outcome<T>) {
        let mut state = self.cell.state.lock().unwrap();
        if state.is_none() {
            *state = Some(outcome);
            self.cell.ready.notify_all();
        }
        self.done = true;
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if !self.done {
            self.set(Outcome::NeverRan);
        }
    }
}

/// Creates a fresh result channel for one submission.
pub(crate) fn channel<T>() -> (Completer<T>, TaskHandle<T>) {
    let cell = Arc::new(Cell {
        state: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        Completer {
            cell: Arc::clone(&cell),
            done: false,
        },
        TaskHandle { cell },
    )
}
