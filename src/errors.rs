//! Error types for the connection pool

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("invalid pool configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to create connection: {0}")]
    ResourceCreation(String),

    #[error("pool exhausted - no connection available after {0} attempts")]
    Exhausted(usize),

    #[error("connection was not acquired from this pool or was already released")]
    IllegalRelease,
}

pub type PoolResult<T> = Result<T, PoolError>;
