//! Core connection pool implementation

use crate::config::{ConnectOptions, PoolConfig};
use crate::errors::{PoolError, PoolResult};
use crate::factory::ConnectionFactory;
use crate::metrics::{MetricsTracker, PoolMetrics};

use crossbeam::queue::ArrayQueue;
use dashmap::DashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Retries after the initial attempt before `acquire` gives up.
pub const MAX_RETRIES: usize = 3;

/// Fixed pause between attempts while waiting for a connection to come back.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// A connection checked out of the pool.
///
/// Derefs to the underlying connection. The handle is cheap to clone; the
/// pool tracks checkout state by id, so hand a connection back with
/// [`ConnectionPool::release`] exactly once regardless of how many handle
/// clones exist.
pub struct PooledConnection<C> {
    conn: Arc<C>,
    id: usize,
}

impl<C> PooledConnection<C> {
    /// Pool-assigned id of this connection.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<C> Clone for PooledConnection<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            id: self.id,
        }
    }
}

impl<C> Deref for PooledConnection<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref()
    }
}

impl<C> fmt::Debug for PooledConnection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Thread-safe pool of database connections with bounded growth.
///
/// Idle connections sit in a FIFO queue; checked-out connections are
/// tracked by id in a concurrent membership set. The live count (idle plus
/// checked out) only moves through atomic compare-and-swap, so it can never
/// be observed above the configured maximum.
pub struct ConnectionPool<F: ConnectionFactory> {
    opts: ConnectOptions,
    config: PoolConfig,
    factory: F,
    idle: ArrayQueue<(Arc<F::Connection>, usize)>,
    in_use: DashMap<usize, ()>,
    live: AtomicUsize,
    next_id: AtomicUsize,
    metrics: MetricsTracker,
}

impl<F: ConnectionFactory> fmt::Debug for ConnectionPool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("config", &self.config)
            .field("live", &self.live.load(Ordering::SeqCst))
            .field("idle", &self.idle.len())
            .finish_non_exhaustive()
    }
}

impl<F: ConnectionFactory> ConnectionPool<F> {
    /// Create a pool and eagerly open `min_size` connections.
    ///
    /// Fails with [`PoolError::InvalidConfiguration`] when the sizing is
    /// inconsistent, or with the factory's [`PoolError::ResourceCreation`]
    /// if any eager create fails; no partially-filled pool escapes either
    /// way.
    pub fn new(opts: ConnectOptions, config: PoolConfig, factory: F) -> PoolResult<Self> {
        config.validate()?;
        tracing::info!(
            url = opts.url(),
            min = config.min_size(),
            max = config.max_size(),
            "creating connection pool"
        );

        let pool = Self {
            // ArrayQueue rejects a zero capacity; a max_size of 0 simply
            // never touches the queue.
            idle: ArrayQueue::new(config.max_size().max(1)),
            in_use: DashMap::new(),
            live: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
            metrics: MetricsTracker::new(),
            opts,
            config,
            factory,
        };

        for _ in 0..pool.config.min_size() {
            let conn = pool.factory.create(&pool.opts)?;
            let id = pool.next_id.fetch_add(1, Ordering::Relaxed);
            pool.live.fetch_add(1, Ordering::SeqCst);
            let _ = pool.idle.push((Arc::new(conn), id));
        }

        Ok(pool)
    }

    /// Check a connection out of the pool.
    ///
    /// Reuses an idle connection when one is available and alive, otherwise
    /// grows the pool up to its maximum size. At capacity this blocks for
    /// up to [`MAX_RETRIES`] backoff intervals waiting for a concurrent
    /// [`release`](Self::release) before failing with
    /// [`PoolError::Exhausted`]. A factory failure is propagated
    /// immediately.
    pub fn acquire(&self) -> PoolResult<PooledConnection<F::Connection>> {
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                thread::sleep(RETRY_BACKOFF);
            }
            if let Some(conn) = self.try_acquire()? {
                return Ok(conn);
            }
        }
        self.exhausted()
    }

    /// Async variant of [`acquire`](Self::acquire) with the same bounded
    /// retry contract, yielding to the runtime between attempts instead of
    /// blocking the thread.
    pub async fn acquire_async(&self) -> PoolResult<PooledConnection<F::Connection>> {
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            if let Some(conn) = self.try_acquire()? {
                return Ok(conn);
            }
        }
        self.exhausted()
    }

    /// Return a checked-out connection to the pool.
    ///
    /// `None` is accepted and ignored. Releasing a connection that is not
    /// currently checked out of this pool - including a second release of
    /// the same connection - fails with [`PoolError::IllegalRelease`]. A
    /// connection that no longer passes the liveness probe is dropped
    /// instead of requeued, freeing its slot for future growth.
    pub fn release(&self, conn: Option<PooledConnection<F::Connection>>) -> PoolResult<()> {
        let Some(handle) = conn else {
            return Ok(());
        };

        // The membership set is the single source of truth for checkout
        // state; removal doubles as the double-release guard.
        if self.in_use.remove(&handle.id).is_none() {
            return Err(PoolError::IllegalRelease);
        }

        if self.factory.is_alive(&handle.conn) {
            // idle is sized to max_size, so the push cannot fail while
            // live <= max_size holds.
            let _ = self.idle.push((handle.conn, handle.id));
        } else {
            self.live.fetch_sub(1, Ordering::SeqCst);
            self.metrics.dead_discarded.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(conn = handle.id, "discarding dead connection on release");
        }
        self.metrics.total_released.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// How many more connections could be checked out right now.
    pub fn available_capacity(&self) -> usize {
        self.config.max_size().saturating_sub(self.in_use.len())
    }

    /// Idle connections waiting for reuse.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Connections currently checked out.
    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    /// Connections tracked by the pool, idle and checked out together.
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Point-in-time metrics snapshot.
    pub fn metrics(&self) -> PoolMetrics {
        self.metrics.snapshot(
            self.idle.len(),
            self.in_use.len(),
            self.live_count(),
            self.config.max_size(),
        )
    }

    /// One acquire attempt: reuse an idle connection or grow the pool.
    ///
    /// `Ok(None)` means the pool is at capacity with nothing usable, the
    /// only outcome worth retrying.
    fn try_acquire(&self) -> PoolResult<Option<PooledConnection<F::Connection>>> {
        if let Some((conn, id)) = self.idle.pop() {
            if self.factory.is_alive(&conn) {
                self.in_use.insert(id, ());
                self.metrics.total_acquired.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(PooledConnection { conn, id }));
            }
            // Dead while idle: drop it and free its slot so the growth
            // step below can replace it.
            self.live.fetch_sub(1, Ordering::SeqCst);
            self.metrics.dead_discarded.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(conn = id, "discarding dead idle connection");
        }

        if !self.try_reserve_slot() {
            return Ok(None);
        }

        let conn = match self.factory.create(&self.opts) {
            Ok(conn) => conn,
            Err(err) => {
                // A failed create must give its reserved slot back.
                self.live.fetch_sub(1, Ordering::SeqCst);
                self.metrics.creation_failures.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.in_use.insert(id, ());
        self.metrics.total_acquired.fetch_add(1, Ordering::Relaxed);
        Ok(Some(PooledConnection {
            conn: Arc::new(conn),
            id,
        }))
    }

    /// Compare-and-increment `live` against `max_size`. Two concurrent
    /// acquirers can never both claim the last remaining slot.
    fn try_reserve_slot(&self) -> bool {
        let max = self.config.max_size();
        self.live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                (live < max).then_some(live + 1)
            })
            .is_ok()
    }

    fn exhausted(&self) -> PoolResult<PooledConnection<F::Connection>> {
        self.metrics.exhausted_events.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(max = self.config.max_size(), "pool exhausted");
        Err(PoolError::Exhausted(MAX_RETRIES + 1))
    }
}
