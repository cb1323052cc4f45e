//! # connpool
//!
//! Thread-safe, bounded database connection pool.
//!
//! ## Features
//!
//! - Lock-free idle queue and checkout tracking
//! - Bounded growth guarded by an atomic compare-and-swap live counter
//! - Liveness validation on reuse and on release; dead connections are
//!   discarded and their capacity reclaimed
//! - Bounded retry with fixed backoff when the pool is exhausted
//! - Double-release and foreign-release detection
//! - Sync and async acquire with the same retry contract
//! - Env-var bootstrap for credentials and sizing
//!
//! ## Quick Start
//!
//! ```rust
//! use connpool::{ConnectOptions, ConnectionFactory, ConnectionPool, PoolConfig, PoolResult};
//!
//! struct SessionFactory;
//!
//! impl ConnectionFactory for SessionFactory {
//!     type Connection = String;
//!
//!     fn create(&self, opts: &ConnectOptions) -> PoolResult<String> {
//!         Ok(format!("session to {}", opts.url()))
//!     }
//! }
//!
//! let pool = ConnectionPool::new(
//!     ConnectOptions::new("db://localhost:5432/app", "app", "hunter2"),
//!     PoolConfig::new(1, 4),
//!     SessionFactory,
//! )
//! .unwrap();
//!
//! let conn = pool.acquire().unwrap();
//! assert_eq!(&*conn, "session to db://localhost:5432/app");
//! pool.release(Some(conn)).unwrap();
//! assert_eq!(pool.idle_count(), 1);
//! ```

mod pool;
mod config;
mod factory;
mod metrics;
mod errors;

pub use pool::{ConnectionPool, PooledConnection, MAX_RETRIES, RETRY_BACKOFF};
pub use config::{ConnectOptions, PoolConfig};
pub use factory::ConnectionFactory;
pub use metrics::PoolMetrics;
pub use errors::{PoolError, PoolResult};
