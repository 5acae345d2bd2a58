//! Application configuration
//!
//! Layered loading with the usual priority order: defaults, then a TOML
//! configuration file, then `ANONRELAY_*` environment variables. A missing
//! bot credential is the only fatal condition; absent moderation or admin
//! settings merely disable those features with a warning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use anonrelay_core::{EngineConfig, UserId, DEFAULT_RATE_LIMIT_MS, DEFAULT_STATE_FILE};

use crate::error::{BotError, Result};

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "anonrelay.toml";

// ----------------------------------------------------------------------------
// Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the bot application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bot credential for the chat transport
    pub token: Option<String>,

    /// Destination chat for mirrored media attachments
    pub moderation_chat: Option<i64>,

    /// Administrator user identifiers
    pub admin_ids: Vec<i64>,

    /// Minimum interval between relayed messages per user, in milliseconds
    pub rate_limit_ms: u64,

    /// Path of the durable state snapshot
    pub state_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: None,
            moderation_chat: None,
            admin_ids: Vec::new(),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl AppConfig {
    /// Load configuration with the standard priority order:
    /// defaults < configuration file < environment variables.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `ANONRELAY_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("ANONRELAY_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                self.token = Some(token);
            }
        }
        if let Ok(raw) = std::env::var("ANONRELAY_MODERATION_CHAT") {
            match raw.trim().parse::<i64>() {
                Ok(id) => self.moderation_chat = Some(id),
                Err(_) => warn!(value = %raw, "invalid ANONRELAY_MODERATION_CHAT, ignoring"),
            }
        }
        if let Ok(raw) = std::env::var("ANONRELAY_ADMIN_IDS") {
            self.admin_ids = parse_admin_ids(&raw);
        }
        if let Ok(raw) = std::env::var("ANONRELAY_RATE_LIMIT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.rate_limit_ms = ms,
                Err(_) => warn!(value = %raw, "invalid ANONRELAY_RATE_LIMIT_MS, ignoring"),
            }
        }
        if let Ok(path) = std::env::var("ANONRELAY_STATE_FILE") {
            if !path.trim().is_empty() {
                self.state_file = PathBuf::from(path.trim());
            }
        }
    }

    /// Validate the configuration, warning about disabled optional features.
    ///
    /// Only a missing credential is fatal.
    pub fn validate(&self) -> Result<()> {
        match &self.token {
            Some(token) if !token.trim().is_empty() => {}
            _ => {
                return Err(BotError::Config(
                    "bot credential not set; provide ANONRELAY_TOKEN or the token config key"
                        .to_string(),
                ))
            }
        }
        if self.moderation_chat.is_none() {
            warn!("moderation destination not set, media mirroring disabled");
        }
        if self.admin_ids.is_empty() {
            warn!("no administrators configured, failure notifications disabled");
        }
        Ok(())
    }

    /// Derive the engine configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            state_file: self.state_file.clone(),
            rate_limit_ms: self.rate_limit_ms,
            moderation_chat: self.moderation_chat.map(UserId::new),
            admins: self.admin_ids.iter().copied().map(UserId::new).collect(),
        }
    }

    /// Redacted JSON view for the administrative show-config command
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "token": if self.token.is_some() { "***" } else { "(not set)" },
            "moderation_chat": self.moderation_chat,
            "admin_ids": self.admin_ids,
            "rate_limit_ms": self.rate_limit_ms,
            "state_file": self.state_file,
        })
    }

    /// Example configuration file content
    pub fn example_config() -> String {
        let example = AppConfig {
            token: Some("123456:replace-me".to_string()),
            moderation_chat: Some(-1001234567890),
            admin_ids: vec![12345, 67890],
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        };
        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| "# failed to generate example config".to_string())
    }
}

/// Parse a comma-separated admin id list, skipping invalid entries
fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(entry = %part, "ignoring invalid admin id");
                None
            }
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
