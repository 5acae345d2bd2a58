//! Error handling for the anonrelay bot application

use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Engine error: {0}")]
    Engine(#[from] anonrelay_core::EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for bot operations
pub type Result<T> = std::result::Result<T, BotError>;
