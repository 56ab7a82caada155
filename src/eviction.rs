//! Background eviction of stale or invalid idle objects

use crate::errors::{PoolError, PoolResult};
use crate::metrics::MetricsTracker;
use crate::pool::{Disposal, PoolInner};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Outcome of one eviction run
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_min_evictable_idle_time(Duration::from_millis(1));
/// let pool = ObjectPool::new(FnFactory::new(|| Ok(0u8)), config).unwrap();
/// pool.prepare(2).unwrap();
///
/// std::thread::sleep(Duration::from_millis(5));
/// let report = pool.evict();
/// assert_eq!(report.evicted_idle, 2);
/// assert_eq!(pool.idle_count(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Idle objects taken out for examination
    pub examined: usize,

    /// Destroyed for exceeding the idle-time threshold
    pub evicted_idle: usize,

    /// Destroyed for failing validation
    pub evicted_invalid: usize,

    /// Survived and went back to the idle registry
    pub kept: usize,

    /// Created to bring the idle registry back up to `min_idle`
    pub replenished: usize,
}

impl EvictionReport {
    pub fn evicted(&self) -> usize {
        self.evicted_idle + self.evicted_invalid
    }
}

impl<T: Send + 'static> PoolInner<T> {
    /// Examine up to `num_tests_per_eviction_run` idle objects, oldest first.
    ///
    /// Candidates are claimed one at a time so that at most one object is
    /// out of the registry on the evictor's behalf at any moment.
    pub(crate) fn run_eviction(&self) -> EvictionReport {
        let mut report = EvictionReport::default();
        let batch = {
            let state = self.state.lock();
            if state.closed {
                return report;
            }
            self.config.num_tests_per_eviction_run.min(state.idle.len())
        };

        for _ in 0..batch {
            let candidate = self.state.lock().idle.pop_front();
            let Some(mut instance) = candidate else {
                break;
            };
            if !instance.start_eviction_test() {
                // Only idle objects live in the registry; put it back untouched.
                self.state.lock().idle.push_back(instance);
                continue;
            }
            report.examined += 1;

            let idle_for = instance.idle_time();
            if self
                .config
                .min_evictable_idle_time
                .is_some_and(|threshold| idle_for > threshold)
            {
                trace!(object_id = instance.id(), idle_ms = idle_for.as_millis() as u64, "evicting idle object");
                report.evicted_idle += 1;
                MetricsTracker::incr(&self.metrics.evicted);
                let _ = self.destroy(instance, false, Disposal::Retired);
                continue;
            }

            if self.config.test_while_idle && !self.factory.validate_object(&instance) {
                trace!(object_id = instance.id(), "evicting object that failed validation");
                report.evicted_invalid += 1;
                MetricsTracker::incr(&self.metrics.evicted);
                MetricsTracker::incr(&self.metrics.validation_failures);
                let _ = self.destroy(instance, false, Disposal::Invalid);
                continue;
            }

            let mut state = self.state.lock();
            if state.closed {
                drop(state);
                let _ = self.destroy(instance, false, Disposal::Retired);
                continue;
            }
            instance.end_eviction_test();
            state.idle.push_back(instance);
            report.kept += 1;
            self.capacity_changed.notify_one();
        }

        report.replenished = self.ensure_min_idle();

        debug!(
            examined = report.examined,
            evicted_idle = report.evicted_idle,
            evicted_invalid = report.evicted_invalid,
            kept = report.kept,
            replenished = report.replenished,
            "eviction run complete"
        );
        report
    }

    fn ensure_min_idle(&self) -> usize {
        if self.config.min_idle == 0 {
            return 0;
        }
        let deficit = {
            let state = self.state.lock();
            if state.closed {
                return 0;
            }
            self.config.min_idle.saturating_sub(state.idle.len())
        };

        let mut added = 0;
        for _ in 0..deficit {
            match self.add_idle_object() {
                Ok(true) => added += 1,
                Ok(false) => break,
                Err(e) => {
                    warn!(error = %e, "failed to replenish idle objects");
                    break;
                }
            }
        }
        added
    }
}

/// Handle to the evictor thread; dropping it stops the thread.
pub(crate) struct Evictor {
    stop: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Evictor {
    /// Spawn a thread that runs an eviction cycle every `period` until the
    /// pool is gone or the handle is dropped.
    pub(crate) fn start<T: Send + 'static>(
        pool: Weak<PoolInner<T>>,
        period: Duration,
    ) -> PoolResult<Self> {
        let (stop, stopped) = channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("lifepool-evictor".to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    let Some(inner) = pool.upgrade() else {
                        break;
                    };
                    inner.run_eviction();
                }
                debug!("evictor stopped");
            })
            .map_err(|e| PoolError::EvictorStart(e.to_string()))?;

        debug!(period_ms = period.as_millis() as u64, "evictor started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for Evictor {
    fn drop(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(handle) = self.handle.take() {
            // The last pool handle may be released on the evictor thread itself.
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("evictor thread panicked");
            }
        }
    }
}
