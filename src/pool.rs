use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use log::{debug, error};

use crate::error::{PoolError, Result};
use crate::promise::{self, TaskHandle};
use crate::queue::TaskQueue;
use crate::task::{Runnable, Task};

/// A fixed-size pool of worker threads executing submitted tasks in FIFO
/// start order.
///
/// Workers are spawned at construction and live until the pool stops. Tasks
/// are submitted either as closures returning a value (read back through a
/// [`TaskHandle`]) or as boxed [`Runnable`] objects (fire-and-forget).
/// Dropping the pool stops it: remaining workers are joined and any tasks
/// still queued are discarded without running.
pub struct ThreadPool {
    queue: Arc<TaskQueue>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a pool with exactly `workers` worker threads.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `workers` is zero. If any worker thread
    /// fails to spawn, construction is aborted: the workers spawned so far
    /// are stopped and joined, and the OS error surfaces as `ThreadSpawn`;
    /// the pool never silently runs with fewer workers than requested.
    pub fn new(workers: usize) -> Result<ThreadPool> {
        if workers == 0 {
            return Err(PoolError::InvalidConfig);
        }

        let queue = Arc::new(TaskQueue::new());
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            match spawn_worker(id, Arc::clone(&queue)) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    queue.close();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::ThreadSpawn(e));
                }
            }
        }

        Ok(ThreadPool {
            queue,
            workers: handles,
        })
    }

    /// Creates a pool sized to the machine's hardware concurrency, with a
    /// floor of two workers.
    pub fn with_default_workers() -> Result<ThreadPool> {
        Self::new(num_cpus::get().max(2))
    }

    /// Submits a closure for execution, returning a handle to its result.
    ///
    /// The closure and its captures are moved into the pool. A panic inside
    /// the closure is caught and delivered through the handle as
    /// [`PoolError::TaskPanicked`]; it does not affect the worker or other
    /// tasks.
    ///
    /// # Errors
    ///
    /// Returns `PoolStopped` if the pool has been stopped. The failure is
    /// synchronous: the task was never scheduled, so nothing is delivered
    /// through a handle.
    pub fn submit<F, T>(&self, f: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (completer, handle) = promise::channel();
        let job = Box::new(move || match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => completer.fulfill(value),
            Err(payload) => completer.fail(panic_message(payload.as_ref())),
        });
        self.queue.push(Task::Job(job))?;
        Ok(handle)
    }

    /// Submits a task object for execution, fire-and-forget.
    ///
    /// Ownership of the task moves into the pool, which drops it after
    /// execution, or without executing it if the pool shuts down first.
    ///
    /// # Errors
    ///
    /// Returns `PoolStopped` if the pool has been stopped.
    pub fn submit_task(&self, task: Box<dyn Runnable>) -> Result<()> {
        self.queue.push(Task::Object(task))
    }

    /// Number of tasks queued but not yet picked up by a worker.
    ///
    /// Advisory only: concurrent submission and execution can change the
    /// count the instant this returns.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    /// Stops the pool and joins every worker thread. Idempotent.
    ///
    /// Sets the stop flag under the queue lock and wakes all workers. A task
    /// already being executed runs to completion before its worker exits;
    /// tasks still queued are not started. They remain in the queue until
    /// the pool is dropped, which discards them.
    pub fn stop(&mut self) {
        self.queue.close();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("Worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for ThreadPool {
    /// Stops the pool if `stop` was never called, so no worker thread
    /// outlives the pool, then discards any tasks that were never started.
    /// Discarding a functional-form task resolves its handle to
    /// [`PoolError::TaskNeverRan`].
    fn drop(&mut self) {
        self.stop();
        let discarded = self.queue.drain();
        if discarded > 0 {
            debug!("Discarded {discarded} queued tasks on teardown");
        }
    }
}

/// Spawns one worker thread that pulls tasks until shutdown.
fn spawn_worker(id: usize, queue: Arc<TaskQueue>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("pool-worker-{id}"))
        .spawn(move || {
            while let Some(task) = queue.pop_blocking() {
                execute(id, task);
            }
            debug!("Worker {id}: pool stopped, exiting");
        })
}

/// Runs one task, confining any failure to that task.
fn execute(id: usize, task: Task) {
    match task {
        Task::Object(mut runnable) => {
            let tag = runnable.name().map(str::to_owned);
            let tag = tag.as_deref().unwrap_or("<unnamed>");
            match panic::catch_unwind(AssertUnwindSafe(|| runnable.run())) {
                Ok(status) => debug!("Worker {id}: task {tag} finished with status {status}"),
                Err(_) => error!("Worker {id}: task {tag} panicked, continuing"),
            }
        }
        // The erased job catches its own panic and routes it into the
        // task's result channel.
        Task::Job(job) => job(),
    }
}

/// Renders a panic payload as text for `TaskPanicked`.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
