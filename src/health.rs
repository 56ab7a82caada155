//! Health monitoring for object pools

use crate::metrics::PoolMetrics;

/// Health status of an object pool
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
///
/// let pool = ObjectPool::new(FnFactory::new(|| Ok(1u8)), PoolConfiguration::default()).unwrap();
///
/// let health = pool.get_health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.active_objects, 0);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    pub idle_objects: usize,

    pub active_objects: usize,

    pub max_total: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Derive a health status from a metrics snapshot
    pub fn from_metrics(metrics: &PoolMetrics, closed: bool) -> Self {
        let mut warnings = Vec::new();
        let mut is_healthy = !closed;

        if closed {
            warnings.push("Pool is closed".to_string());
        }

        if metrics.utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", metrics.utilization * 100.0));
            is_healthy = false;
        }

        if metrics.idle_objects == 0 && metrics.max_total > 0 {
            warnings.push("No idle objects available".to_string());
        }

        if metrics.waiters > 0 {
            warnings.push(format!("{} borrower(s) waiting for capacity", metrics.waiters));
        }

        if metrics.destroy_failures > 0 {
            warnings.push(format!("{} destroy failure(s) recorded", metrics.destroy_failures));
        }

        Self {
            is_healthy,
            utilization: metrics.utilization,
            idle_objects: metrics.idle_objects,
            active_objects: metrics.active_objects,
            max_total: metrics.max_total,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
