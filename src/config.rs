//! Pool configuration options

use crate::errors::{PoolError, PoolResult};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for object pool behavior
///
/// # Examples
///
/// ```
/// use lifepool::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_max_total(16)
///     .with_max_idle(8)
///     .with_borrow_timeout(Duration::from_secs(5))
///     .with_eviction(Duration::from_secs(30), Duration::from_secs(600));
///
/// assert_eq!(config.max_total, 16);
/// assert_eq!(config.max_idle, Some(8));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolConfiguration {
    /// Maximum number of live objects (idle + on loan + in transition)
    pub max_total: usize,

    /// Maximum number of idle objects kept; extras are destroyed on return
    pub max_idle: Option<usize>,

    /// Number of idle objects the evictor tries to keep around
    pub min_idle: usize,

    /// Idle time after which the evictor destroys an object unconditionally
    pub min_evictable_idle_time: Option<Duration>,

    /// Period of the background evictor; `None` disables it
    pub time_between_eviction_runs: Option<Duration>,

    /// Maximum number of idle objects examined per eviction run
    pub num_tests_per_eviction_run: usize,

    /// Default wait bound used by `borrow_object`
    pub borrow_timeout: Duration,

    /// Validate idle objects before lending them out
    pub test_on_borrow: bool,

    /// Validate objects when they come back
    pub test_on_return: bool,

    /// Validate idle objects during eviction runs
    pub test_while_idle: bool,

    /// How many candidates a single borrow may burn through when
    /// activation or validation keeps failing
    pub max_borrow_attempts: usize,

    /// Lend the most recently returned object first
    pub lifo: bool,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            max_total: 8,
            max_idle: None,
            min_idle: 0,
            min_evictable_idle_time: Some(Duration::from_secs(30 * 60)),
            time_between_eviction_runs: None,
            num_tests_per_eviction_run: 3,
            borrow_timeout: Duration::from_secs(30),
            test_on_borrow: false,
            test_on_return: false,
            test_while_idle: true,
            max_borrow_attempts: 3,
            lifo: true,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity bound
    pub fn with_max_total(mut self, max_total: usize) -> Self {
        self.max_total = max_total;
        self
    }

    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = Some(max_idle);
        self
    }

    pub fn with_min_idle(mut self, min_idle: usize) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// Set the default borrow timeout
    pub fn with_borrow_timeout(mut self, timeout: Duration) -> Self {
        self.borrow_timeout = timeout;
        self
    }

    /// Run the evictor every `period`, destroying objects idle for longer than `min_idle_time`
    pub fn with_eviction(mut self, period: Duration, min_idle_time: Duration) -> Self {
        self.time_between_eviction_runs = Some(period);
        self.min_evictable_idle_time = Some(min_idle_time);
        self
    }

    /// Set the idle-time threshold without enabling the background evictor
    pub fn with_min_evictable_idle_time(mut self, min_idle_time: Duration) -> Self {
        self.min_evictable_idle_time = Some(min_idle_time);
        self
    }

    pub fn with_tests_per_eviction_run(mut self, count: usize) -> Self {
        self.num_tests_per_eviction_run = count;
        self
    }

    pub fn with_test_on_borrow(mut self, enabled: bool) -> Self {
        self.test_on_borrow = enabled;
        self
    }

    pub fn with_test_on_return(mut self, enabled: bool) -> Self {
        self.test_on_return = enabled;
        self
    }

    pub fn with_test_while_idle(mut self, enabled: bool) -> Self {
        self.test_while_idle = enabled;
        self
    }

    pub fn with_max_borrow_attempts(mut self, attempts: usize) -> Self {
        self.max_borrow_attempts = attempts;
        self
    }

    /// Choose LIFO (default) or FIFO lending order
    pub fn with_lifo(mut self, lifo: bool) -> Self {
        self.lifo = lifo;
        self
    }

    /// Check the configuration for contradictions
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_total == 0 {
            return Err(PoolError::InvalidConfiguration(
                "max_total must be greater than 0".to_string(),
            ));
        }
        if self.min_idle > self.max_total {
            return Err(PoolError::InvalidConfiguration(format!(
                "min_idle ({}) must not exceed max_total ({})",
                self.min_idle, self.max_total
            )));
        }
        if let Some(max_idle) = self.max_idle
            && self.min_idle > max_idle
        {
            return Err(PoolError::InvalidConfiguration(format!(
                "min_idle ({}) must not exceed max_idle ({})",
                self.min_idle, max_idle
            )));
        }
        if self.max_borrow_attempts == 0 {
            return Err(PoolError::InvalidConfiguration(
                "max_borrow_attempts must be greater than 0".to_string(),
            ));
        }
        if self.time_between_eviction_runs.is_some_and(|p| p.is_zero()) {
            return Err(PoolError::InvalidConfiguration(
                "time_between_eviction_runs must be greater than zero".to_string(),
            ));
        }
        if self.time_between_eviction_runs.is_some() && self.num_tests_per_eviction_run == 0 {
            return Err(PoolError::InvalidConfiguration(
                "num_tests_per_eviction_run must be greater than 0 when eviction is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Option object using the externally recognized option names
///
/// Durations are expressed in milliseconds; a missing or non-positive
/// `timeBetweenEvictionRunsMillis` disables the evictor, a missing or
/// negative `maxIdle` leaves idle retention bounded only by `maxTotal`.
///
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use lifepool::{PoolConfiguration, PoolOptions};
///
/// let options: PoolOptions = serde_json::from_str(
///     r#"{ "maxTotal": 4, "testOnBorrow": true, "timeBetweenEvictionRunsMillis": 1000 }"#,
/// ).unwrap();
/// let config = PoolConfiguration::try_from(options).unwrap();
/// assert_eq!(config.max_total, 4);
/// assert!(config.test_on_borrow);
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PoolOptions {
    pub max_total: Option<usize>,
    pub max_idle: Option<i64>,
    pub min_idle: Option<usize>,
    pub min_evictable_idle_time_millis: Option<i64>,
    pub time_between_eviction_runs_millis: Option<i64>,
    pub num_tests_per_eviction_run: Option<usize>,
    pub borrow_timeout_millis: Option<u64>,
    pub test_on_borrow: Option<bool>,
    pub test_on_return: Option<bool>,
    pub test_while_idle: Option<bool>,
}

fn positive_millis(value: Option<i64>) -> Option<Duration> {
    value
        .filter(|ms| *ms > 0)
        .map(|ms| Duration::from_millis(ms as u64))
}

impl TryFrom<PoolOptions> for PoolConfiguration {
    type Error = PoolError;

    fn try_from(options: PoolOptions) -> PoolResult<Self> {
        let defaults = PoolConfiguration::default();
        let config = PoolConfiguration {
            max_total: options.max_total.unwrap_or(defaults.max_total),
            max_idle: options.max_idle.and_then(|n| usize::try_from(n).ok()),
            min_idle: options.min_idle.unwrap_or(defaults.min_idle),
            min_evictable_idle_time: match options.min_evictable_idle_time_millis {
                Some(ms) => positive_millis(Some(ms)),
                None => defaults.min_evictable_idle_time,
            },
            time_between_eviction_runs: positive_millis(options.time_between_eviction_runs_millis),
            num_tests_per_eviction_run: options
                .num_tests_per_eviction_run
                .unwrap_or(defaults.num_tests_per_eviction_run),
            borrow_timeout: options
                .borrow_timeout_millis
                .map(Duration::from_millis)
                .unwrap_or(defaults.borrow_timeout),
            test_on_borrow: options.test_on_borrow.unwrap_or(defaults.test_on_borrow),
            test_on_return: options.test_on_return.unwrap_or(defaults.test_on_return),
            test_while_idle: options.test_while_idle.unwrap_or(defaults.test_while_idle),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}
