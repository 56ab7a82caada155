//! # lifepool
//!
//! Thread-safe generic object pool for expensive resources (threads,
//! sockets, file handles, connections). The pool creates objects through a
//! [`PooledObjectFactory`], lends them out, takes them back, and destroys
//! them when they go bad or sit idle for too long.
//!
//! ## Features
//!
//! - Bounded capacity with blocking, timed and cancellable borrows
//! - Lifecycle callbacks: make, activate, validate, passivate, destroy
//! - Automatic return of objects via RAII (Drop trait)
//! - LIFO lending to keep warm objects busy
//! - Background evictor for idle-time and validation based culling
//! - `min_idle` replenishment and pool warm-up
//! - Async borrow on the tokio blocking pool
//! - Health monitoring, metrics and Prometheus export
//!
//! ## Quick Start
//!
//! ```rust
//! use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
//!
//! let factory = FnFactory::new(|| Ok(String::new()))
//!     .with_passivate(|s: &mut String| {
//!         s.clear();
//!         Ok(())
//!     });
//! let pool = ObjectPool::new(factory, PoolConfiguration::new().with_max_total(4)).unwrap();
//! {
//!     let mut s = pool.borrow_object().unwrap();
//!     s.push_str("in use");
//!     // Object automatically returned when `s` goes out of scope
//! }
//! assert_eq!(pool.idle_count(), 1);
//! ```

mod config;
mod errors;
mod eviction;
mod factory;
mod health;
mod instance;
mod metrics;
mod pool;

pub use config::{PoolConfiguration, PoolOptions};
pub use errors::{FactoryError, PoolError, PoolResult};
pub use eviction::EvictionReport;
pub use factory::{FnFactory, PooledObjectFactory};
pub use health::HealthStatus;
pub use instance::{ObjectState, PooledInstance};
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{CancelToken, ObjectPool, PooledObject};
