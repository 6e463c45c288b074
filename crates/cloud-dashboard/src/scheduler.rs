//! Refresh scheduling.
//!
//! At most one refresh is in flight. Triggers that arrive while a refresh is
//! running are dropped, not queued.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// What caused a refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First refresh after the dashboard starts.
    Startup,
    /// Periodic ticker.
    Tick,
    /// Terminal resize.
    Resize,
    /// User pressed the refresh key.
    Manual,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Tick => "tick",
            Self::Resize => "resize",
            Self::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next trigger.
    Idle,
    /// A refresh holds the guard.
    Refreshing,
    /// Shut down; no further refreshes start.
    Closed,
}

/// Mutual exclusion for refresh cycles with try-acquire semantics.
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    permits: Arc<Semaphore>,
}

impl Default for RefreshGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGuard {
    /// A guard with a single permit.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the permit if it is free.
    pub fn try_acquire(&self) -> Option<RefreshPermit> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .ok()
            .map(|permit| RefreshPermit { _permit: permit })
    }

    /// Whether a refresh currently holds the permit.
    pub fn is_held(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

/// Proof of an in-flight refresh. Dropping it releases the guard.
#[derive(Debug)]
pub struct RefreshPermit {
    _permit: OwnedSemaphorePermit,
}

/// Decides whether a trigger starts a refresh.
#[derive(Debug, Default)]
pub struct Scheduler {
    guard: RefreshGuard,
    closed: bool,
    dropped: AtomicU64,
}

impl Scheduler {
    /// A scheduler in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a refresh for `trigger`.
    ///
    /// Returns the permit to hold for the duration of the refresh, or `None`
    /// when the scheduler is closed or another refresh is in flight.
    pub fn trigger(&self, trigger: Trigger) -> Option<RefreshPermit> {
        if self.closed {
            return None;
        }
        let permit = self.guard.try_acquire();
        if permit.is_none() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            debug!(%trigger, "refresh in flight, trigger dropped");
        }
        permit
    }

    /// Stop accepting triggers.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.closed {
            Phase::Closed
        } else if self.guard.is_held() {
            Phase::Refreshing
        } else {
            Phase::Idle
        }
    }

    /// Number of triggers dropped so far.
    pub fn dropped_triggers(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
