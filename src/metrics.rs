//! Metrics collection and export for object pools

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "metrics")]
use serde::Serialize;

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
///
/// let pool = ObjectPool::new(FnFactory::new(|| Ok(0u32)), PoolConfiguration::default()).unwrap();
///
/// {
///     let _obj = pool.borrow_object().unwrap();
///     let metrics = pool.get_metrics();
///     assert_eq!(metrics.created, 1);
///     assert_eq!(metrics.active_objects, 1);
/// }
/// assert_eq!(pool.get_metrics().idle_objects, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "metrics", derive(Serialize))]
pub struct PoolMetrics {
    /// Objects ever created by the factory
    pub created: u64,

    /// Objects ever destroyed
    pub destroyed: u64,

    /// Successful borrows
    pub borrowed: u64,

    /// Objects returned to the idle registry
    pub returned: u64,

    /// Objects destroyed by the evictor
    pub evicted: u64,

    /// Failed validate/activate/passivate checks
    pub validation_failures: u64,

    /// Destroy callbacks that reported an error
    pub destroy_failures: u64,

    /// Borrows that gave up waiting for capacity
    pub timeouts: u64,

    /// Current live objects (idle + on loan + in transition)
    pub live_objects: usize,

    /// Current idle objects
    pub idle_objects: usize,

    /// Current objects on loan
    pub active_objects: usize,

    /// Borrowers currently blocked on capacity
    pub waiters: usize,

    /// How long the oldest outstanding loan has been out, in milliseconds
    pub longest_loan_ms: u64,

    /// Pool utilization ratio (0.0 to 1.0)
    pub utilization: f64,

    /// Configured capacity bound
    pub max_total: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("created".to_string(), self.created.to_string());
        metrics.insert("destroyed".to_string(), self.destroyed.to_string());
        metrics.insert("borrowed".to_string(), self.borrowed.to_string());
        metrics.insert("returned".to_string(), self.returned.to_string());
        metrics.insert("evicted".to_string(), self.evicted.to_string());
        metrics.insert("validation_failures".to_string(), self.validation_failures.to_string());
        metrics.insert("destroy_failures".to_string(), self.destroy_failures.to_string());
        metrics.insert("timeouts".to_string(), self.timeouts.to_string());
        metrics.insert("live_objects".to_string(), self.live_objects.to_string());
        metrics.insert("idle_objects".to_string(), self.idle_objects.to_string());
        metrics.insert("active_objects".to_string(), self.active_objects.to_string());
        metrics.insert("waiters".to_string(), self.waiters.to_string());
        metrics.insert("longest_loan_ms".to_string(), self.longest_loan_ms.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert("max_total".to_string(), self.max_total.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
    /// use std::collections::HashMap;
    ///
    /// let pool = ObjectPool::new(FnFactory::new(|| Ok(0u8)), PoolConfiguration::default()).unwrap();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("sockets", Some(&tags));
    /// assert!(output.contains("objectpool_objects_active"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        let gauges: [(&str, &str, String); 5] = [
            ("objectpool_objects_live", "Current live objects", metrics.live_objects.to_string()),
            ("objectpool_objects_idle", "Current idle objects", metrics.idle_objects.to_string()),
            ("objectpool_objects_active", "Current objects on loan", metrics.active_objects.to_string()),
            ("objectpool_waiters", "Borrowers waiting for capacity", metrics.waiters.to_string()),
            ("objectpool_utilization", "Pool utilization ratio", format!("{:.2}", metrics.utilization)),
        ];
        for (name, help, value) in gauges {
            Self::write_metric(&mut output, name, help, "gauge", &labels, &value);
        }

        let counters: [(&str, &str, u64); 8] = [
            ("objectpool_objects_created_total", "Objects created", metrics.created),
            ("objectpool_objects_destroyed_total", "Objects destroyed", metrics.destroyed),
            ("objectpool_objects_borrowed_total", "Successful borrows", metrics.borrowed),
            ("objectpool_objects_returned_total", "Objects returned to idle", metrics.returned),
            ("objectpool_objects_evicted_total", "Objects destroyed by the evictor", metrics.evicted),
            ("objectpool_validation_failures_total", "Failed lifecycle checks", metrics.validation_failures),
            ("objectpool_destroy_failures_total", "Failed destroy callbacks", metrics.destroy_failures),
            ("objectpool_borrow_timeouts_total", "Borrows that timed out", metrics.timeouts),
        ];
        for (name, help, value) in counters {
            Self::write_metric(&mut output, name, help, "counter", &labels, &value.to_string());
        }

        output
    }

    fn write_metric(output: &mut String, name: &str, help: &str, kind: &str, labels: &str, value: &str) {
        let _ = writeln!(output, "# HELP {} {}", name, help);
        let _ = writeln!(output, "# TYPE {} {}", name, kind);
        let _ = writeln!(output, "{}{{{}}} {}", name, labels, value);
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort();
            for (key, value) in sorted {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    pub created: AtomicU64,
    pub destroyed: AtomicU64,
    pub borrowed: AtomicU64,
    pub returned: AtomicU64,
    pub evicted: AtomicU64,
    pub validation_failures: AtomicU64,
    pub destroy_failures: AtomicU64,
    pub timeouts: AtomicU64,
}

/// Gauges read under the pool lock
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gauges {
    pub live: usize,
    pub idle: usize,
    pub active: usize,
    pub waiters: usize,
    pub longest_loan_ms: u64,
    pub max_total: usize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self, gauges: Gauges) -> PoolMetrics {
        let utilization = if gauges.max_total > 0 {
            gauges.active as f64 / gauges.max_total as f64
        } else {
            0.0
        };

        PoolMetrics {
            created: self.created.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            borrowed: self.borrowed.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            destroy_failures: self.destroy_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            live_objects: gauges.live,
            idle_objects: gauges.idle,
            active_objects: gauges.active,
            waiters: gauges.waiters,
            longest_loan_ms: gauges.longest_loan_ms,
            utilization,
            max_total: gauges.max_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauges() -> Gauges {
        Gauges {
            live: 3,
            idle: 1,
            active: 2,
            waiters: 0,
            longest_loan_ms: 12,
            max_total: 4,
        }
    }

    #[test]
    fn test_snapshot_reads_counters() {
        let tracker = MetricsTracker::new();
        MetricsTracker::incr(&tracker.created);
        MetricsTracker::incr(&tracker.created);
        MetricsTracker::incr(&tracker.timeouts);

        let metrics = tracker.get_metrics(gauges());
        assert_eq!(metrics.created, 2);
        assert_eq!(metrics.timeouts, 1);
        assert_eq!(metrics.utilization, 0.5);
        assert_eq!(metrics.export()["active_objects"], "2");
    }

    #[test]
    fn test_prometheus_labels_are_sorted() {
        let metrics = MetricsTracker::new().get_metrics(gauges());
        let mut tags = HashMap::new();
        tags.insert("zone".to_string(), "b".to_string());
        tags.insert("app".to_string(), "a".to_string());

        let output = MetricsExporter::export_prometheus(&metrics, "db", Some(&tags));
        assert!(output.contains("objectpool_objects_live{pool=\"db\",app=\"a\",zone=\"b\"} 3"));
        assert!(output.contains("# TYPE objectpool_objects_created_total counter"));
    }
}
