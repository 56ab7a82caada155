//! Pooled instance wrapper and its lifecycle state machine

use std::fmt;
use std::time::{Duration, Instant};

/// Lifecycle state of a pooled instance
///
/// ```text
/// Idle ──borrow──▶ Allocated ──return──▶ Idle
///  │  ▲                │
///  ▼  │                └──failure / invalidate──▶ Destroyed
/// Eviction ──fail──▶ Invalid ──▶ Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectState {
    /// In the idle registry, available for borrowing
    Idle,

    /// On loan to a caller
    Allocated,

    /// Claimed by the evictor for testing
    Eviction,

    /// Failed validation, awaiting destruction
    Invalid,

    /// Terminal
    Destroyed,
}

impl ObjectState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: ObjectState) -> bool {
        use ObjectState::*;
        matches!(
            (self, next),
            (Idle, Allocated)
                | (Idle, Eviction)
                | (Idle, Invalid)
                | (Idle, Destroyed)
                | (Allocated, Idle)
                | (Allocated, Invalid)
                | (Allocated, Destroyed)
                | (Eviction, Idle)
                | (Eviction, Invalid)
                | (Eviction, Destroyed)
                | (Invalid, Destroyed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ObjectState::Invalid | ObjectState::Destroyed)
    }
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectState::Idle => "idle",
            ObjectState::Allocated => "allocated",
            ObjectState::Eviction => "eviction",
            ObjectState::Invalid => "invalid",
            ObjectState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// One pooled resource plus the bookkeeping the pool keeps for it.
///
/// Factories receive this wrapper in every callback, so they can make
/// decisions based on age or usage (e.g. refuse to validate an instance
/// that has served too many borrows).
pub struct PooledInstance<T> {
    id: u64,
    value: T,
    state: ObjectState,
    created_at: Instant,
    last_active: Instant,
    borrow_count: u64,
}

impl<T> PooledInstance<T> {
    pub(crate) fn new(id: u64, value: T) -> Self {
        let now = Instant::now();
        Self {
            id,
            value,
            state: ObjectState::Idle,
            created_at: now,
            last_active: now,
            borrow_count: 0,
        }
    }

    /// Pool-unique identifier of this instance
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Last time the instance was borrowed or returned
    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    /// Number of times the instance has been lent out
    pub fn borrow_count(&self) -> u64 {
        self.borrow_count
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// How long the instance has been sitting since its last activity
    pub fn idle_time(&self) -> Duration {
        self.last_active.elapsed()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwrap the resource, discarding the bookkeeping.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Move to `next`, refusing illegal transitions.
    ///
    /// Returns `false` (leaving the state untouched) when the transition is
    /// not part of the lifecycle graph.
    pub(crate) fn transition(&mut self, next: ObjectState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::error!(
                object_id = self.id,
                from = %self.state,
                to = %next,
                "illegal pooled object state transition"
            );
            return false;
        }
        self.state = next;
        true
    }

    /// Commit a borrow: `Idle -> Allocated`.
    pub(crate) fn allocate(&mut self) -> bool {
        if !self.transition(ObjectState::Allocated) {
            return false;
        }
        self.borrow_count += 1;
        self.last_active = Instant::now();
        true
    }

    /// Commit a return: `Allocated -> Idle`.
    pub(crate) fn deallocate(&mut self) -> bool {
        if !self.transition(ObjectState::Idle) {
            return false;
        }
        self.last_active = Instant::now();
        true
    }

    /// Claim for an eviction test: `Idle -> Eviction`.
    pub(crate) fn start_eviction_test(&mut self) -> bool {
        self.transition(ObjectState::Eviction)
    }

    /// Survived an eviction test: `Eviction -> Idle`. The idle clock keeps running.
    pub(crate) fn end_eviction_test(&mut self) -> bool {
        self.transition(ObjectState::Idle)
    }

    pub(crate) fn invalidate(&mut self) {
        if self.state != ObjectState::Invalid && self.state != ObjectState::Destroyed {
            self.transition(ObjectState::Invalid);
        }
    }

    /// Take the instance out of service for good.
    pub(crate) fn retire(&mut self) {
        if self.state != ObjectState::Destroyed {
            self.transition(ObjectState::Destroyed);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledInstance")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("borrow_count", &self.borrow_count)
            .field("value", &self.value)
            .finish()
    }
}
