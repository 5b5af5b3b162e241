use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::error::{PoolError, Result};
use crate::task::Task;

/// Queue contents and the stop flag share one lock, so the wait predicate
/// `!tasks.is_empty() || !running` is always checked atomically and no
/// wakeup can be lost: every state change that flips the predicate happens
/// under this lock and is followed by a notify.
struct QueueState {
    tasks: VecDeque<Task>,
    running: bool,
}

/// FIFO holding area for pending tasks, shared between submitters and
/// workers.
pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    pub(crate) fn new() -> TaskQueue {
        TaskQueue {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                running: true,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends a task to the tail and wakes one idle worker.
    ///
    /// Fails with `PoolStopped` once the pool is shutting down; the task is
    /// dropped without running.
    pub(crate) fn push(&self, task: Task) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.running {
            return Err(PoolError::PoolStopped);
        }
        state.tasks.push_back(task);
        self.available.notify_one();
        Ok(())
    }

    /// Blocks until a task is available or the pool is shutting down.
    ///
    /// Returns `None` once `running` is false, even if tasks remain queued,
    /// and the calling worker must exit its loop. The pop happens in the same
    /// critical section as the emptiness check, so no two workers can take
    /// the same task.
    pub(crate) fn pop_blocking(&self) -> Option<Task> {
        let mut state = self.state.lock().unwrap();
        loop {
            if !state.running {
                return None;
            }
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            state = self.available.wait(state).unwrap();
        }
    }

    /// Current pending-task count. Advisory only: it may be stale the
    /// instant this returns.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    /// Flips the stop flag and wakes every waiting worker. Idempotent; the
    /// flag never reverts to running.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock().unwrap();
        if state.running {
            state.running = false;
            self.available.notify_all();
        }
    }

    /// Discards all still-queued tasks, returning how many were dropped.
    ///
    /// Dropping a functional-form task resolves its result channel to
    /// "never ran"; object-form tasks are simply destroyed.
    pub(crate) fn drain(&self) -> usize {
        let mut state = self.state.lock().unwrap();
        let discarded = state.tasks.len();
        state.tasks.clear();
        discarded
    }
}
