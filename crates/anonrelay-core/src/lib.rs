//! Anonrelay Core Engine
//!
//! This crate provides the matchmaking and relay engine for anonymous
//! one-on-one chat: the durable waiting queue and pairing table, per-user
//! rate limiting, the relay decision logic, and the admin notification
//! side channel. The chat transport itself is a boundary trait implemented
//! by the host application.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod matchmaker;
pub mod message;
pub mod notifier;
pub mod rate_limiter;
pub mod store;
pub mod transport;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{EngineConfig, DEFAULT_RATE_LIMIT_MS, DEFAULT_STATE_FILE};
pub use dispatch::{DispatchOutcome, RelayDispatcher, CONNECT_PROMPT};
pub use errors::{DeliveryError, EngineError, Result, StoreError};
pub use matchmaker::Matchmaker;
pub use message::{InboundMessage, MessageKind};
pub use notifier::AdminNotifier;
pub use rate_limiter::RelayRateLimiter;
pub use store::StateStore;
pub use transport::ChatTransport;
pub use types::{SessionStatus, SystemTimeSource, TimeSource, Timestamp, UserId};
