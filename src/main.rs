// lifepool - demo binary
// Four workers share a two-connection pool; the evictor culls the idle
// connections once the workers are done.

use lifepool::{FactoryError, ObjectPool, PoolConfiguration, PooledInstance, PooledObjectFactory};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct Connection {
    id: usize,
    open: bool,
    requests: u32,
}

struct ConnectionFactory {
    next_id: AtomicUsize,
}

impl PooledObjectFactory<Connection> for ConnectionFactory {
    fn make_object(&self) -> Result<Connection, FactoryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        println!("  [factory] opening connection {}", id);
        Ok(Connection {
            id,
            open: true,
            requests: 0,
        })
    }

    fn destroy_object(&self, obj: PooledInstance<Connection>) -> Result<(), FactoryError> {
        println!("  [factory] closing connection {}", obj.value().id);
        Ok(())
    }

    fn validate_object(&self, obj: &PooledInstance<Connection>) -> bool {
        obj.value().open && obj.value().requests < 3
    }

    fn passivate_object(&self, obj: &mut PooledInstance<Connection>) -> Result<(), FactoryError> {
        obj.value_mut().requests += 1;
        Ok(())
    }
}

fn main() {
    println!("=== lifepool demo ===");

    let config = PoolConfiguration::new()
        .with_max_total(2)
        .with_test_on_borrow(true)
        .with_eviction(Duration::from_millis(100), Duration::from_millis(300));
    let pool = match ObjectPool::new(
        ConnectionFactory {
            next_id: AtomicUsize::new(0),
        },
        config,
    ) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to create pool: {}", e);
            return;
        }
    };

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let pool = pool.clone();
            thread::spawn(move || {
                for _ in 0..3 {
                    match pool.borrow(Duration::from_secs(1)) {
                        Ok(conn) => {
                            println!("  worker {} using connection {}", worker, conn.id);
                            thread::sleep(Duration::from_millis(20));
                        }
                        Err(e) => println!("  worker {} failed: {}", worker, e),
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    println!("Metrics: {:?}", pool.get_metrics());
    thread::sleep(Duration::from_millis(600));
    println!("Idle after eviction: {}", pool.idle_count());

    if let Err(e) = pool.close() {
        eprintln!("close reported: {}", e);
    }
}
