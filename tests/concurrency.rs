//! Multi-threaded behaviour of the pool

use lifepool::{
    FactoryError, ObjectPool, ObjectState, PoolConfiguration, PoolError, PooledInstance,
    PooledObjectFactory,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Activate,
    Validate,
    Passivate,
    Destroy,
}

/// Resource whose `in_use` flag catches double leasing
#[derive(Debug)]
struct Slot {
    in_use: AtomicBool,
}

#[derive(Default)]
struct RecordingFactory {
    made: AtomicUsize,
    log: Mutex<Vec<(u64, Event)>>,
    destroyed_while_allocated: AtomicBool,
}

impl RecordingFactory {
    fn record(&self, obj: &PooledInstance<Slot>, event: Event) {
        self.log.lock().push((obj.id(), event));
    }
}

impl PooledObjectFactory<Slot> for Arc<RecordingFactory> {
    fn make_object(&self) -> Result<Slot, FactoryError> {
        self.made.fetch_add(1, Ordering::SeqCst);
        Ok(Slot {
            in_use: AtomicBool::new(false),
        })
    }

    fn destroy_object(&self, obj: PooledInstance<Slot>) -> Result<(), FactoryError> {
        if obj.state() == ObjectState::Allocated {
            self.destroyed_while_allocated.store(true, Ordering::SeqCst);
        }
        self.record(&obj, Event::Destroy);
        Ok(())
    }

    fn validate_object(&self, obj: &PooledInstance<Slot>) -> bool {
        self.record(obj, Event::Validate);
        // Every fifth borrow finds the object worn out.
        obj.borrow_count() % 5 != 4
    }

    fn activate_object(&self, obj: &mut PooledInstance<Slot>) -> Result<(), FactoryError> {
        self.record(obj, Event::Activate);
        Ok(())
    }

    fn passivate_object(&self, obj: &mut PooledInstance<Slot>) -> Result<(), FactoryError> {
        self.record(obj, Event::Passivate);
        Ok(())
    }
}

fn hammer(pool: &ObjectPool<Slot>, threads: usize, rounds: usize, max_total: usize) {
    let concurrent = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..rounds {
                    let obj = match pool.borrow(Duration::from_secs(5)) {
                        Ok(obj) => obj,
                        Err(PoolError::ValidationFailed) => continue,
                        Err(e) => panic!("unexpected borrow failure: {e}"),
                    };
                    assert!(
                        obj.in_use
                            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                            .is_ok(),
                        "object {} lent to two borrowers",
                        obj.id()
                    );
                    assert_eq!(obj.instance().state(), ObjectState::Allocated);

                    let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::yield_now();
                    concurrent.fetch_sub(1, Ordering::SeqCst);

                    obj.in_use.store(false, Ordering::SeqCst);
                    let _ = pool.return_object(obj);
                }
            });
        }
    });

    assert!(peak.load(Ordering::SeqCst) <= max_total);
}

#[test]
fn exclusivity_and_capacity_under_contention() {
    let factory = Arc::new(RecordingFactory::default());
    let config = PoolConfiguration::new()
        .with_max_total(3)
        .with_test_on_borrow(true)
        .with_test_on_return(true)
        .with_eviction(Duration::from_millis(2), Duration::from_millis(1));
    let pool = ObjectPool::new(Arc::clone(&factory), config).unwrap();

    hammer(&pool, 8, 200, 3);

    assert!(pool.live_count() <= 3);
    assert_eq!(pool.active_count(), 0);
    assert!(!factory.destroyed_while_allocated.load(Ordering::SeqCst));
    pool.close().unwrap();
}

#[test]
fn lifecycle_callbacks_run_in_order() {
    let factory = Arc::new(RecordingFactory::default());
    let config = PoolConfiguration::new()
        .with_max_total(2)
        .with_test_on_borrow(true)
        .with_test_on_return(true);
    let pool = ObjectPool::new(Arc::clone(&factory), config).unwrap();

    hammer(&pool, 4, 100, 2);
    pool.close().unwrap();
    assert!(factory.made.load(Ordering::SeqCst) >= 2);

    let mut per_object: HashMap<u64, Vec<Event>> = HashMap::new();
    for (id, event) in factory.log.lock().iter() {
        per_object.entry(*id).or_default().push(*event);
    }

    for (id, events) in per_object {
        assert_eq!(events[0], Event::Activate, "object {id} lent before activation");
        let destroys = events.iter().filter(|e| **e == Event::Destroy).count();
        assert!(destroys <= 1, "object {id} destroyed {destroys} times");
        if destroys == 1 {
            assert_eq!(*events.last().unwrap(), Event::Destroy, "object {id} used after destroy");
        }
        for pair in events.windows(2) {
            if pair[1] == Event::Validate {
                assert!(
                    matches!(pair[0], Event::Activate | Event::Passivate),
                    "object {id} validated after {:?}",
                    pair[0]
                );
            }
            if pair[0] == Event::Activate {
                assert_eq!(pair[1], Event::Validate, "object {id} skipped validate after activate");
            }
        }
    }
}

#[test]
fn zero_timeout_borrowers_beyond_capacity_fail() {
    let pool = ObjectPool::new(
        Arc::new(RecordingFactory::default()),
        PoolConfiguration::new().with_max_total(2),
    )
    .unwrap();
    let start = Barrier::new(3);
    let hold = Barrier::new(3);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|_| {
                scope.spawn(|| {
                    start.wait();
                    let result = pool.borrow(Duration::ZERO);
                    hold.wait();
                    result.map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    let failures: Vec<_> = results.into_iter().filter_map(Result::err).collect();
    assert_eq!(failures, vec![PoolError::Timeout(Duration::ZERO)]);
}

#[test]
fn waiters_are_served_as_objects_come_back() {
    let pool = ObjectPool::new(
        Arc::new(RecordingFactory::default()),
        PoolConfiguration::new().with_max_total(1),
    )
    .unwrap();
    let served = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let obj = pool.borrow(Duration::from_secs(5)).unwrap();
                thread::sleep(Duration::from_millis(10));
                served.fetch_add(1, Ordering::SeqCst);
                drop(obj);
            });
        }
    });

    assert_eq!(served.load(Ordering::SeqCst), 4);
    assert_eq!(pool.get_metrics().waiters, 0);
    assert_eq!(pool.live_count(), 1);
}

#[test]
fn timed_out_borrow_leaves_pool_consistent() {
    let pool = ObjectPool::new(
        Arc::new(RecordingFactory::default()),
        PoolConfiguration::new().with_max_total(1),
    )
    .unwrap();
    let held = pool.borrow_object().unwrap();

    let err = pool.borrow(Duration::from_millis(30)).unwrap_err();
    assert_eq!(err, PoolError::Timeout(Duration::from_millis(30)));
    assert_eq!(pool.get_metrics().waiters, 0);
    assert_eq!(pool.live_count(), 1);

    pool.return_object(held).unwrap();
    assert!(pool.try_borrow().unwrap().is_some());
}

#[test]
fn idle_objects_past_threshold_evicted_within_one_cycle() {
    let factory = Arc::new(RecordingFactory::default());
    let config = PoolConfiguration::new()
        .with_max_total(4)
        .with_tests_per_eviction_run(4)
        .with_eviction(Duration::from_millis(25), Duration::from_millis(50));
    let pool = ObjectPool::new(Arc::clone(&factory), config).unwrap();
    assert_eq!(pool.prepare(4).unwrap(), 4);

    // threshold plus a couple of evictor periods
    thread::sleep(Duration::from_millis(200));
    assert_eq!(pool.idle_count(), 0);
    assert_eq!(pool.live_count(), 0);
    assert!(!factory.destroyed_while_allocated.load(Ordering::SeqCst));
}
