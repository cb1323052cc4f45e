// connpool - bounded database connection pool
// Demo binary; the actual library is in lib.rs

use connpool::{ConnectOptions, ConnectionFactory, ConnectionPool, PoolConfig, PoolResult};

/// Stand-in driver so the demo runs without a database server.
struct DemoFactory;

impl ConnectionFactory for DemoFactory {
    type Connection = String;

    fn create(&self, opts: &ConnectOptions) -> PoolResult<String> {
        Ok(format!("{} as {}", opts.url(), opts.username()))
    }
}

fn main() -> PoolResult<()> {
    tracing_subscriber::fmt::init();

    let opts = ConnectOptions::from_env()
        .unwrap_or_else(|_| ConnectOptions::new("db://localhost:3306/testdb", "app", "app"));

    let pool = ConnectionPool::new(opts, PoolConfig::new(1, 3), DemoFactory)?;

    let conn = pool.acquire()?;
    println!(
        "acquired {conn:?}: {} idle, capacity for {} more",
        pool.idle_count(),
        pool.available_capacity()
    );

    pool.release(Some(conn))?;
    println!("released: {} idle", pool.idle_count());
    Ok(())
}
