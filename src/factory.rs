//! The seam between the pool and the database driver

use std::sync::Arc;

use crate::config::ConnectOptions;
use crate::errors::PoolResult;

/// Opens and probes physical connections on the pool's behalf.
///
/// The pool never speaks the wire protocol itself; everything it knows
/// about a connection goes through this trait.
pub trait ConnectionFactory: Send + Sync + 'static {
    type Connection: Send + Sync + 'static;

    /// Open a new physical connection.
    fn create(&self, opts: &ConnectOptions) -> PoolResult<Self::Connection>;

    /// Probe whether a connection is still usable.
    ///
    /// Must not panic; implementations treat any internal probe failure as
    /// not alive.
    fn is_alive(&self, _conn: &Self::Connection) -> bool {
        true
    }
}

impl<F: ConnectionFactory> ConnectionFactory for Arc<F> {
    type Connection = F::Connection;

    fn create(&self, opts: &ConnectOptions) -> PoolResult<Self::Connection> {
        (**self).create(opts)
    }

    fn is_alive(&self, conn: &Self::Connection) -> bool {
        (**self).is_alive(conn)
    }
}
