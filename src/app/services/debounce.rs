//! Query debouncing
//!
//! Free-text input is applied to the directory only after the user has
//! stopped typing for a quiescence interval. The debouncer never reads the
//! clock itself; callers pass the current `Instant` so behaviour is fully
//! determined by its inputs.

use std::time::{Duration, Instant};
use tracing::trace;

/// Holds the most recent query until it has been quiet for `interval`
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    interval: Duration,
    pending: Option<(String, Instant)>,
}

impl QueryDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record a new query, superseding any pending one
    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        let query = query.into();
        trace!("Debouncing query '{}'", query);
        self.pending = Some((query, now));
    }

    /// Take the pending query if it has been quiet for the full interval
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = self
            .deadline()
            .is_some_and(|deadline| now >= deadline);

        if ready {
            self.pending.take().map(|(query, _)| query)
        } else {
            None
        }
    }

    /// When the pending query becomes ready, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|(_, pushed_at)| *pushed_at + self.interval)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending query immediately, regardless of the interval
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(query, _)| query)
    }
}
