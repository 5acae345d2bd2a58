//! Core types for the anonrelay engine
//!
//! This module defines the fundamental types used throughout the engine,
//! using newtype patterns for semantic validation and type safety.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// User Identifier
// ----------------------------------------------------------------------------

/// Opaque transport-assigned identifier for an end user or chat destination.
///
/// Signed because moderation destinations (group chats) carry negative
/// identifiers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId from its raw transport value
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get current wall-clock timestamp
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as u64)
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since another timestamp (saturating)
    pub fn millis_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

// ----------------------------------------------------------------------------
// Time Source Trait
// ----------------------------------------------------------------------------

/// Trait for providing timestamps to time-dependent components
///
/// Lets the rate limiter be driven by a controllable clock in tests while
/// production code uses the system clock.
pub trait TimeSource {
    /// Get the current timestamp
    fn now(&self) -> Timestamp;
}

/// Standard library implementation of TimeSource
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl SystemTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

// ----------------------------------------------------------------------------
// Session Status
// ----------------------------------------------------------------------------

/// Read-only view of a user's position in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Currently paired with a partner
    Connected,
    /// Waiting in the queue for a partner
    Searching,
    /// Neither paired nor queued
    Idle,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Searching => write!(f, "searching"),
            Self::Idle => write!(f, "idle"),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_round_trip() {
        let id = UserId::new(-1001234567890);
        assert_eq!(id.as_i64(), -1001234567890);
        assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn test_timestamp_millis_since_saturates() {
        let earlier = Timestamp::new(5_000);
        let later = Timestamp::new(6_300);
        assert_eq!(later.millis_since(earlier), 1_300);
        assert_eq!(earlier.millis_since(later), 0);
    }

    #[test]
    fn test_session_status_display() {
        assert_eq!(SessionStatus::Connected.to_string(), "connected");
        assert_eq!(SessionStatus::Searching.to_string(), "searching");
        assert_eq!(SessionStatus::Idle.to_string(), "idle");
    }
}
