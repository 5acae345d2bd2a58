//! Engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Minimum interval between accepted relay actions per user (milliseconds)
pub const DEFAULT_RATE_LIMIT_MS: u64 = 1_300;

/// Default snapshot file name
pub const DEFAULT_STATE_FILE: &str = "anon_state.json";

// ----------------------------------------------------------------------------
// Engine Configuration
// ----------------------------------------------------------------------------

/// Configuration for the matchmaking and relay engine
///
/// Moderation and admin notification are optional features: an absent
/// moderation destination disables mirroring, an empty admin set disables
/// notifications. Both are warnings at startup, never errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path of the durable queue/pairs snapshot
    pub state_file: PathBuf,

    /// Minimum interval between relayed messages per user, in milliseconds
    pub rate_limit_ms: u64,

    /// Destination chat for mirrored media attachments
    pub moderation_chat: Option<UserId>,

    /// Administrators receiving operational-failure notices
    pub admins: Vec<UserId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            moderation_chat: None,
            admins: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Whether the given user may invoke administrative operations
    pub fn is_admin(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.rate_limit_ms, 1_300);
        assert!(config.moderation_chat.is_none());
        assert!(config.admins.is_empty());
        assert!(!config.is_admin(UserId::new(1)));
    }

    #[test]
    fn test_is_admin() {
        let config = EngineConfig {
            admins: vec![UserId::new(10), UserId::new(20)],
            ..Default::default()
        };
        assert!(config.is_admin(UserId::new(10)));
        assert!(!config.is_admin(UserId::new(30)));
    }
}
