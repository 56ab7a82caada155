//! Core object pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::eviction::{EvictionReport, Evictor};
use crate::factory::PooledObjectFactory;
use crate::health::HealthStatus;
use crate::instance::{ObjectState, PooledInstance};
use crate::metrics::{Gauges, MetricsExporter, MetricsTracker, PoolMetrics};

use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Why an object is leaving the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposal {
    /// Failed a validation check; handed to the factory as `Invalid`
    Invalid,

    /// Invalidated by the caller, evicted for age, failed activation or
    /// passivation, over the idle cap, or drained at shutdown
    Retired,
}

/// A borrowed object that goes back to its pool when dropped
///
/// Dropping the handle runs the same return protocol as
/// [`ObjectPool::return_object`], but any failure can only be logged.
pub struct PooledObject<T: Send + 'static> {
    instance: Option<PooledInstance<T>>,
    pool: Arc<PoolInner<T>>,
}

impl<T: Send + 'static> PooledObject<T> {
    fn new(instance: PooledInstance<T>, pool: Arc<PoolInner<T>>) -> Self {
        Self {
            instance: Some(instance),
            pool,
        }
    }

    /// Pool bookkeeping for the borrowed object
    pub fn instance(&self) -> &PooledInstance<T> {
        // Only `take_instance` empties the slot and it consumes `self`.
        self.instance.as_ref().expect("pooled object already released")
    }

    pub fn id(&self) -> u64 {
        self.instance().id()
    }

    /// Take the object out of the pool for good.
    ///
    /// The pool forgets the object and frees its capacity slot; the
    /// factory's `destroy_object` is not called.
    pub fn detach(mut self) -> T {
        let instance = self.take_instance();
        self.pool.forget(instance.id());
        instance.into_inner()
    }

    fn take_instance(&mut self) -> PooledInstance<T> {
        self.instance.take().expect("pooled object already released")
    }
}

impl<T: Send + 'static> Deref for PooledObject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.instance().value()
    }
}

impl<T: Send + 'static> DerefMut for PooledObject<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance
            .as_mut()
            .expect("pooled object already released")
            .value_mut()
    }
}

impl<T: Send + 'static> Drop for PooledObject<T> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            let id = instance.id();
            if let Err(e) = self.pool.give_back(instance) {
                warn!(object_id = id, error = %e, "implicit return of pooled object failed");
            }
        }
    }
}

impl<T: Send + fmt::Debug + 'static> fmt::Debug for PooledObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledObject")
            .field("instance", &self.instance)
            .finish()
    }
}

/// Handle that aborts borrows blocked on capacity
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration, PoolError};
/// use std::time::Duration;
///
/// let pool = ObjectPool::new(
///     FnFactory::new(|| Ok(0u8)),
///     PoolConfiguration::new().with_max_total(1),
/// ).unwrap();
/// let _held = pool.borrow_object().unwrap();
///
/// let token = pool.cancel_token();
/// token.cancel();
/// let result = pool.borrow_cancellable(Duration::from_secs(60), &token);
/// assert_eq!(result.unwrap_err(), PoolError::Cancelled);
/// ```
#[derive(Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    pool: Weak<dyn WakeWaiters>,
}

impl CancelToken {
    /// Cancel every borrow waiting on this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(pool) = self.pool.upgrade() {
            pool.wake_all();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

pub(crate) trait WakeWaiters: Send + Sync {
    fn wake_all(&self);
}

/// Bookkeeping guarded by the pool lock
pub(crate) struct PoolState<T> {
    /// Idle registry; the back holds the most recently returned object
    pub idle: VecDeque<PooledInstance<T>>,
    /// Idle + on loan + in transition
    pub live: usize,
    /// On loan, including borrows still running activate/validate
    pub active: usize,
    pub waiters: usize,
    pub closed: bool,
}

enum Claim<T> {
    Idle(PooledInstance<T>),
    Create,
}

pub(crate) struct PoolInner<T: Send + 'static> {
    pub factory: Box<dyn PooledObjectFactory<T>>,
    pub config: PoolConfiguration,
    pub state: Mutex<PoolState<T>>,
    /// Signalled whenever an object is returned or destroyed
    pub capacity_changed: Condvar,
    /// Objects on loan, keyed by id, with the time they were lent
    pub loans: DashMap<u64, Instant>,
    pub metrics: MetricsTracker,
    next_id: AtomicU64,
    evictor: Mutex<Option<Evictor>>,
}

impl<T: Send + 'static> PoolInner<T> {
    fn claim(
        &self,
        deadline: Option<Instant>,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> PoolResult<Claim<T>> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(PoolError::Closed);
            }
            if cancel.is_some_and(CancelToken::is_cancelled) {
                self.pass_on(&state);
                return Err(PoolError::Cancelled);
            }

            let candidate = if self.config.lifo {
                state.idle.pop_back()
            } else {
                state.idle.pop_front()
            };
            if let Some(instance) = candidate {
                state.active += 1;
                return Ok(Claim::Idle(instance));
            }
            if state.live < self.config.max_total {
                state.live += 1;
                state.active += 1;
                return Ok(Claim::Create);
            }

            state.waiters += 1;
            match deadline {
                None => self.capacity_changed.wait(&mut state),
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        state.waiters -= 1;
                        MetricsTracker::incr(&self.metrics.timeouts);
                        self.pass_on(&state);
                        return Err(PoolError::Timeout(timeout));
                    }
                    let _ = self.capacity_changed.wait_until(&mut state, deadline);
                }
            }
            state.waiters -= 1;
        }
    }

    /// A waiter leaving without using its wake-up hands it to the next one.
    fn pass_on(&self, state: &PoolState<T>) {
        if state.waiters > 0 && (!state.idle.is_empty() || state.live < self.config.max_total) {
            self.capacity_changed.notify_one();
        }
    }

    pub(crate) fn create(&self) -> PoolResult<PooledInstance<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.factory.make_object() {
            Ok(value) => {
                MetricsTracker::incr(&self.metrics.created);
                debug!(object_id = id, "created pooled object");
                Ok(PooledInstance::new(id, value))
            }
            Err(e) => {
                warn!(error = %e, "factory failed to create pooled object");
                Err(PoolError::CreationFailed(e.to_string()))
            }
        }
    }

    /// Give a capacity slot back and wake one waiter.
    pub(crate) fn release_slot(&self, was_active: bool) {
        let mut state = self.state.lock();
        state.live -= 1;
        if was_active {
            state.active -= 1;
        }
        self.capacity_changed.notify_one();
    }

    /// Destroy an object that is owned by the calling thread.
    ///
    /// Failures are logged and counted; the object is gone either way.
    pub(crate) fn destroy(
        &self,
        mut instance: PooledInstance<T>,
        was_active: bool,
        disposal: Disposal,
    ) -> PoolResult<()> {
        let id = instance.id();
        match disposal {
            Disposal::Invalid => instance.invalidate(),
            Disposal::Retired => instance.retire(),
        }
        let result = self.factory.destroy_object(instance);
        MetricsTracker::incr(&self.metrics.destroyed);
        self.release_slot(was_active);

        match result {
            Ok(()) => {
                trace!(object_id = id, "destroyed pooled object");
                Ok(())
            }
            Err(e) => {
                MetricsTracker::incr(&self.metrics.destroy_failures);
                warn!(object_id = id, error = %e, "failed to destroy pooled object");
                Err(PoolError::DestroyFailed(e.to_string()))
            }
        }
    }

    /// Run activate and validate on a claimed candidate, destroying it on failure.
    fn prepare_for_loan(
        &self,
        mut instance: PooledInstance<T>,
        fresh: bool,
    ) -> PoolResult<PooledInstance<T>> {
        if let Err(e) = self.factory.activate_object(&mut instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            debug!(object_id = instance.id(), error = %e, "activation failed");
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Err(PoolError::ActivationFailed(e.to_string()));
        }

        // New objects are always checked once before anyone sees them.
        if (fresh || self.config.test_on_borrow) && !self.factory.validate_object(&instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            debug!(object_id = instance.id(), "validation failed on borrow");
            let _ = self.destroy(instance, true, Disposal::Invalid);
            return Err(PoolError::ValidationFailed);
        }

        Ok(instance)
    }

    fn commit_loan(&self, mut instance: PooledInstance<T>) -> PoolResult<PooledInstance<T>> {
        if self.state.lock().closed {
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Err(PoolError::Closed);
        }
        if !instance.allocate() {
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Err(PoolError::ProtocolViolation("object was not idle when lent"));
        }
        self.loans.insert(instance.id(), Instant::now());
        MetricsTracker::incr(&self.metrics.borrowed);
        Ok(instance)
    }

    /// Return protocol: passivate, optionally validate, re-enter the idle registry.
    pub(crate) fn give_back(&self, mut instance: PooledInstance<T>) -> PoolResult<()> {
        let id = instance.id();
        if self.loans.remove(&id).is_none() || instance.state() != ObjectState::Allocated {
            warn!(object_id = id, "returned object is not on loan from this pool");
            return Err(PoolError::ProtocolViolation(
                "object is not currently on loan from this pool",
            ));
        }

        if self.state.lock().closed {
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Ok(());
        }

        if let Err(e) = self.factory.passivate_object(&mut instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            debug!(object_id = id, error = %e, "passivation failed");
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Err(PoolError::PassivationFailed(e.to_string()));
        }

        if self.config.test_on_return && !self.factory.validate_object(&instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            debug!(object_id = id, "validation failed on return");
            let _ = self.destroy(instance, true, Disposal::Invalid);
            return Err(PoolError::ValidationFailed);
        }

        let mut state = self.state.lock();
        let over_idle_cap = self
            .config
            .max_idle
            .is_some_and(|max_idle| state.idle.len() >= max_idle);
        if state.closed || over_idle_cap {
            drop(state);
            trace!(object_id = id, "returned object not kept idle");
            let _ = self.destroy(instance, true, Disposal::Retired);
            return Ok(());
        }

        instance.deallocate();
        state.idle.push_back(instance);
        state.active -= 1;
        MetricsTracker::incr(&self.metrics.returned);
        self.capacity_changed.notify_one();
        Ok(())
    }

    /// Caller-signalled broken object: destroy, never re-enter idle.
    fn invalidate(&self, instance: PooledInstance<T>) -> PoolResult<()> {
        let id = instance.id();
        if self.loans.remove(&id).is_none() {
            warn!(object_id = id, "invalidated object is not on loan from this pool");
            return Err(PoolError::ProtocolViolation(
                "object is not currently on loan from this pool",
            ));
        }
        debug!(object_id = id, "invalidating pooled object");
        let _ = self.destroy(instance, true, Disposal::Retired);
        Ok(())
    }

    fn forget(&self, id: u64) {
        if self.loans.remove(&id).is_some() {
            debug!(object_id = id, "detached pooled object");
            self.release_slot(true);
        }
    }

    /// Create an object straight into the idle registry.
    ///
    /// Returns `Ok(false)` when there is no room for it.
    pub(crate) fn add_idle_object(&self) -> PoolResult<bool> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(PoolError::Closed);
            }
            let idle_full = self
                .config
                .max_idle
                .is_some_and(|max_idle| state.idle.len() >= max_idle);
            if state.live >= self.config.max_total || idle_full {
                return Ok(false);
            }
            state.live += 1;
        }

        let mut instance = match self.create() {
            Ok(instance) => instance,
            Err(e) => {
                self.release_slot(false);
                return Err(e);
            }
        };

        if !self.factory.validate_object(&instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            let _ = self.destroy(instance, false, Disposal::Invalid);
            return Err(PoolError::ValidationFailed);
        }
        if let Err(e) = self.factory.passivate_object(&mut instance) {
            MetricsTracker::incr(&self.metrics.validation_failures);
            let _ = self.destroy(instance, false, Disposal::Retired);
            return Err(PoolError::PassivationFailed(e.to_string()));
        }

        let mut state = self.state.lock();
        if state.closed {
            drop(state);
            let _ = self.destroy(instance, false, Disposal::Retired);
            return Err(PoolError::Closed);
        }
        state.idle.push_back(instance);
        self.capacity_changed.notify_one();
        Ok(true)
    }

    fn gauges(&self) -> Gauges {
        let longest_loan_ms = self
            .loans
            .iter()
            .map(|loan| loan.value().elapsed().as_millis() as u64)
            .max()
            .unwrap_or(0);
        let state = self.state.lock();
        Gauges {
            live: state.live,
            idle: state.idle.len(),
            active: state.active,
            waiters: state.waiters,
            longest_loan_ms,
            max_total: self.config.max_total,
        }
    }

    fn close(&self) -> PoolResult<()> {
        let evictor = self.evictor.lock().take();
        drop(evictor);

        let drained: Vec<_> = {
            let mut state = self.state.lock();
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            self.capacity_changed.notify_all();
            debug!(idle = state.idle.len(), on_loan = state.active, "closing pool");
            std::mem::take(&mut state.idle).into_iter().collect()
        };

        let mut failed = 0;
        let mut first = None;
        for instance in drained {
            if let Err(e) = self.destroy(instance, false, Disposal::Retired) {
                failed += 1;
                first.get_or_insert_with(|| e.to_string());
            }
        }

        if failed > 0 {
            return Err(PoolError::ShutdownFailed {
                failed,
                first: first.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl<T: Send + 'static> WakeWaiters for PoolInner<T> {
    fn wake_all(&self) {
        let _state = self.state.lock();
        self.capacity_changed.notify_all();
    }
}

impl<T: Send + 'static> Drop for PoolInner<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "errors while dropping pool");
        }
    }
}

/// Thread-safe pool of factory-made objects
///
/// Cloning the pool is cheap; clones share the same objects.
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
/// use std::time::Duration;
///
/// let pool = ObjectPool::new(
///     FnFactory::new(|| Ok(Vec::<u8>::with_capacity(1024))),
///     PoolConfiguration::new().with_max_total(2),
/// ).unwrap();
///
/// let mut buf = pool.borrow(Duration::from_millis(100)).unwrap();
/// buf.extend_from_slice(b"payload");
/// pool.return_object(buf).unwrap();
///
/// assert_eq!(pool.idle_count(), 1);
/// pool.close().unwrap();
/// ```
pub struct ObjectPool<T: Send + 'static> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Send + 'static> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("config", &self.inner.config)
            .field("metrics", &self.get_metrics())
            .finish()
    }
}

impl<T: Send + 'static> ObjectPool<T> {
    /// Create a pool; starts the evictor when the configuration asks for one.
    pub fn new<F>(factory: F, config: PoolConfiguration) -> PoolResult<Self>
    where
        F: PooledObjectFactory<T> + 'static,
    {
        config.validate()?;
        let period = config.time_between_eviction_runs;
        let inner = Arc::new(PoolInner {
            factory: Box::new(factory),
            state: Mutex::new(PoolState {
                idle: VecDeque::with_capacity(config.max_total),
                live: 0,
                active: 0,
                waiters: 0,
                closed: false,
            }),
            config,
            capacity_changed: Condvar::new(),
            loans: DashMap::new(),
            metrics: MetricsTracker::new(),
            next_id: AtomicU64::new(0),
            evictor: Mutex::new(None),
        });

        if let Some(period) = period {
            let evictor = Evictor::start(Arc::downgrade(&inner), period)?;
            *inner.evictor.lock() = Some(evictor);
        }

        Ok(Self { inner })
    }

    /// Borrow an object, waiting up to `timeout` for capacity.
    ///
    /// A zero timeout never blocks.
    pub fn borrow(&self, timeout: Duration) -> PoolResult<PooledObject<T>> {
        self.borrow_inner(timeout, None)
    }

    /// Borrow an object using the configured default timeout
    pub fn borrow_object(&self) -> PoolResult<PooledObject<T>> {
        self.borrow(self.inner.config.borrow_timeout)
    }

    /// Borrow without waiting for capacity.
    ///
    /// `Ok(None)` means the pool is at capacity with nothing idle; every
    /// other failure (closed pool, creation or lifecycle errors) is returned.
    pub fn try_borrow(&self) -> PoolResult<Option<PooledObject<T>>> {
        match self.borrow(Duration::ZERO) {
            Ok(obj) => Ok(Some(obj)),
            Err(PoolError::Timeout(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Borrow an object, giving up early if `token` is cancelled.
    pub fn borrow_cancellable(
        &self,
        timeout: Duration,
        token: &CancelToken,
    ) -> PoolResult<PooledObject<T>> {
        if !std::ptr::addr_eq(token.pool.as_ptr(), Arc::as_ptr(&self.inner)) {
            return Err(PoolError::ProtocolViolation(
                "cancel token was created by a different pool",
            ));
        }
        self.borrow_inner(timeout, Some(token))
    }

    /// Borrow asynchronously using the configured default timeout
    pub async fn borrow_async(&self) -> PoolResult<PooledObject<T>> {
        let pool = self.clone();
        let timeout = self.inner.config.borrow_timeout;

        tokio::task::spawn_blocking(move || pool.borrow(timeout))
            .await
            .map_err(|_| PoolError::Cancelled)?
    }

    fn borrow_inner(
        &self,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> PoolResult<PooledObject<T>> {
        let inner = &self.inner;
        let deadline = Instant::now().checked_add(timeout);
        let mut last_error = PoolError::ValidationFailed;

        for attempt in 1..=inner.config.max_borrow_attempts {
            let (instance, fresh) = match inner.claim(deadline, timeout, cancel)? {
                Claim::Idle(instance) => (instance, false),
                Claim::Create => match inner.create() {
                    Ok(instance) => (instance, true),
                    Err(e) => {
                        inner.release_slot(true);
                        return Err(e);
                    }
                },
            };

            match inner.prepare_for_loan(instance, fresh) {
                Ok(instance) => {
                    let instance = inner.commit_loan(instance)?;
                    return Ok(PooledObject::new(instance, Arc::clone(inner)));
                }
                Err(e) => {
                    debug!(attempt, error = %e, "borrow candidate rejected");
                    last_error = e;
                }
            }
        }

        warn!(
            attempts = inner.config.max_borrow_attempts,
            error = %last_error,
            "borrow gave up after repeated lifecycle failures"
        );
        Err(last_error)
    }

    /// Return a borrowed object.
    ///
    /// Fails with `ProtocolViolation` for objects from another pool (they go
    /// home through their drop path instead), and with the lifecycle error
    /// when passivation or validation rejected the object, which is then
    /// destroyed.
    pub fn return_object(&self, mut obj: PooledObject<T>) -> PoolResult<()> {
        if !Arc::ptr_eq(&self.inner, &obj.pool) {
            warn!(object_id = obj.id(), "object returned to a pool that does not own it");
            return Err(PoolError::ProtocolViolation(
                "object was borrowed from a different pool",
            ));
        }
        let instance = obj.take_instance();
        self.inner.give_back(instance)
    }

    /// Destroy a borrowed object the caller found broken.
    pub fn invalidate(&self, mut obj: PooledObject<T>) -> PoolResult<()> {
        if !Arc::ptr_eq(&self.inner, &obj.pool) {
            warn!(object_id = obj.id(), "object invalidated on a pool that does not own it");
            return Err(PoolError::ProtocolViolation(
                "object was borrowed from a different pool",
            ));
        }
        let instance = obj.take_instance();
        self.inner.invalidate(instance)
    }

    /// Create one object and park it in the idle registry.
    ///
    /// Returns `false` when the pool is at capacity or the idle cap is reached.
    pub fn add_object(&self) -> PoolResult<bool> {
        self.inner.add_idle_object()
    }

    /// Pre-populate the idle registry with up to `count` objects
    pub fn prepare(&self, count: usize) -> PoolResult<usize> {
        let mut added = 0;
        for _ in 0..count {
            if !self.add_object()? {
                break;
            }
            added += 1;
        }
        Ok(added)
    }

    /// Run one eviction cycle on the calling thread
    pub fn evict(&self) -> EvictionReport {
        self.inner.run_eviction()
    }

    /// Token for [`borrow_cancellable`](Self::borrow_cancellable)
    pub fn cancel_token(&self) -> CancelToken {
        let weak = Arc::downgrade(&self.inner);
        let pool: Weak<dyn WakeWaiters> = weak;
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            pool,
        }
    }

    /// Close the pool.
    ///
    /// Idle objects are destroyed now, the evictor is stopped, waiting and
    /// future borrows fail with `Closed`. Objects on loan are destroyed when
    /// they come back. Destroy failures are reported once, aggregated.
    pub fn close(&self) -> PoolResult<()> {
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    pub fn config(&self) -> &PoolConfiguration {
        &self.inner.config
    }

    pub fn idle_count(&self) -> usize {
        self.inner.state.lock().idle.len()
    }

    /// Objects on loan, including borrows still being activated
    pub fn active_count(&self) -> usize {
        self.inner.state.lock().active
    }

    pub fn live_count(&self) -> usize {
        self.inner.state.lock().live
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.inner.metrics.get_metrics(self.inner.gauges())
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus::from_metrics(&self.get_metrics(), self.is_closed())
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }
}
