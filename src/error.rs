use std::io;
use thiserror::Error;

/// Error type for taskpool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The requested worker count was zero.
    #[error("Invalid worker count: a pool needs at least one worker")]
    InvalidConfig,

    /// An OS worker thread could not be spawned during construction.
    #[error("Failed to spawn worker thread: {0}")]
    ThreadSpawn(#[from] io::Error),

    /// A submission was attempted after the pool had been stopped.
    #[error("Thread pool has stopped")]
    PoolStopped,

    /// The task body panicked; the payload is captured as text.
    #[error("Task panicked: {0}")]
    TaskPanicked(String),

    /// The task was discarded by shutdown before it ever ran.
    #[error("Task was discarded by shutdown before it ran")]
    TaskNeverRan,
}

/// Result type alias for taskpool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
