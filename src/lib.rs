#![deny(missing_docs)]

//! A fixed-size worker-thread pool with blocking result handles.
//!
//! Worker threads are spawned once at construction and pull tasks from a
//! shared FIFO queue. Tasks are submitted either as closures whose result
//! is read back through a [`TaskHandle`], or as boxed [`Runnable`] objects
//! executed fire-and-forget. Stopping the pool, explicitly or by dropping
//! it, wakes and joins every worker; tasks that never started are
//! discarded deterministically.

mod error;
mod pool;
mod promise;
mod queue;
mod task;

pub use error::{PoolError, Result};
pub use pool::ThreadPool;
pub use promise::TaskHandle;
pub use task::Runnable;
