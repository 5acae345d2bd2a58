//! Error types for the anonrelay engine
//!
//! Contains the per-domain error types (state store, delivery) and the main
//! EngineError type that unifies them, together with the policy each boundary
//! applies: persistence and delivery failures are recovered locally,
//! configuration failures are fatal at startup.

use crate::types::UserId;

// ----------------------------------------------------------------------------
// State Store Errors
// ----------------------------------------------------------------------------

/// Errors from state store mutations and snapshot persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("User {user} cannot be paired with itself")]
    SelfPairing { user: UserId },

    #[error("User {user} already has an active partner")]
    AlreadyPaired { user: UserId },

    #[error("User {user} is already waiting in the queue")]
    AlreadyQueued { user: UserId },
}

// ----------------------------------------------------------------------------
// Delivery Errors
// ----------------------------------------------------------------------------

/// Errors from the transport boundary (send/copy/forward failures)
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Send to {destination} failed: {reason}")]
    Send { destination: UserId, reason: String },

    #[error("Transport is not available")]
    Unavailable,
}

impl DeliveryError {
    /// Create a send failure for a destination
    pub fn send_failed<R: Into<String>>(destination: UserId, reason: R) -> Self {
        DeliveryError::Send {
            destination,
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Engine Error
// ----------------------------------------------------------------------------

/// Unified error type for the anonrelay engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("State store error: {0}")]
    Store(#[from] StoreError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl EngineError {
    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        EngineError::Configuration {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, EngineError>;
