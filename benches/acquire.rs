use connpool::{ConnectOptions, ConnectionFactory, ConnectionPool, PoolConfig, PoolResult};
use criterion::{Criterion, criterion_group, criterion_main};

struct NoopFactory;

impl ConnectionFactory for NoopFactory {
    type Connection = ();

    fn create(&self, _opts: &ConnectOptions) -> PoolResult<()> {
        Ok(())
    }
}

fn acquire_release(c: &mut Criterion) {
    let pool = ConnectionPool::new(
        ConnectOptions::new("bench://", "bench", "bench"),
        PoolConfig::new(8, 8),
        NoopFactory,
    )
    .unwrap();

    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let conn = pool.acquire().unwrap();
            pool.release(Some(conn)).unwrap();
        })
    });
}

criterion_group!(benches, acquire_release);
criterion_main!(benches);
