//! Pool counters and point-in-time metrics snapshots

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of pool state together with cumulative counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMetrics {
    /// Connections handed out since the pool was created
    pub total_acquired: usize,

    /// Connections accepted back since the pool was created
    pub total_released: usize,

    /// Connections dropped after failing the liveness probe
    pub dead_discarded: usize,

    /// Acquire calls that gave up after exhausting their retries
    pub exhausted_events: usize,

    /// Factory calls that failed to produce a connection
    pub creation_failures: usize,

    /// Idle connections at snapshot time
    pub idle_connections: usize,

    /// Checked-out connections at snapshot time
    pub in_use_connections: usize,

    /// Connections tracked by the pool at snapshot time
    pub live_connections: usize,

    /// Upper bound on live connections
    pub max_size: usize,

    /// Checked-out share of capacity (0.0 to 1.0)
    pub utilization: f64,
}

/// Internal counter block shared by the acquire and release paths.
pub(crate) struct MetricsTracker {
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub dead_discarded: AtomicUsize,
    pub exhausted_events: AtomicUsize,
    pub creation_failures: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_acquired: AtomicUsize::new(0),
            total_released: AtomicUsize::new(0),
            dead_discarded: AtomicUsize::new(0),
            exhausted_events: AtomicUsize::new(0),
            creation_failures: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(
        &self,
        idle: usize,
        in_use: usize,
        live: usize,
        max_size: usize,
    ) -> PoolMetrics {
        let utilization = if max_size > 0 {
            in_use as f64 / max_size as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            dead_discarded: self.dead_discarded.load(Ordering::Relaxed),
            exhausted_events: self.exhausted_events.load(Ordering::Relaxed),
            creation_failures: self.creation_failures.load(Ordering::Relaxed),
            idle_connections: idle,
            in_use_connections: in_use,
            live_connections: live,
            max_size,
            utilization,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
