//! Per-user rate limiting for relay actions
//!
//! A token-less fixed-window gate: a user's relay action is throttled when
//! it arrives within the minimum interval of their last accepted action.
//! The ledger is transient and resets with the process; one user's activity
//! never throttles another.

use hashbrown::HashMap;

use crate::config::DEFAULT_RATE_LIMIT_MS;
use crate::types::{TimeSource, Timestamp, UserId};

// ----------------------------------------------------------------------------
// Relay Rate Limiter
// ----------------------------------------------------------------------------

/// Tracks the last accepted relay action per user
#[derive(Debug)]
pub struct RelayRateLimiter<T: TimeSource> {
    /// Minimum interval between accepted actions, in milliseconds
    min_interval_ms: u64,
    /// Last accepted action per user
    last_action: HashMap<UserId, Timestamp>,
    time_source: T,
}

impl<T: TimeSource> RelayRateLimiter<T> {
    /// Create a rate limiter with the default 1.3 s interval
    pub fn new(time_source: T) -> Self {
        Self::with_interval(DEFAULT_RATE_LIMIT_MS, time_source)
    }

    /// Create a rate limiter with a custom minimum interval
    pub fn with_interval(min_interval_ms: u64, time_source: T) -> Self {
        Self {
            min_interval_ms,
            last_action: HashMap::new(),
            time_source,
        }
    }

    /// Check whether a relay action from the user must be dropped.
    ///
    /// A non-throttled call records the action, so callers must invoke this
    /// exactly once per relay attempt.
    pub fn is_throttled(&mut self, user: UserId) -> bool {
        let now = self.time_source.now();
        if let Some(&last) = self.last_action.get(&user) {
            if now.millis_since(last) < self.min_interval_ms {
                return true;
            }
        }
        self.last_action.insert(user, now);
        false
    }

    /// Configured minimum interval in milliseconds
    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
