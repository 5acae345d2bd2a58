//! Chat transport abstraction
//!
//! Boundary trait for the external chat network. The engine never learns how
//! messages move; it only asks for the four delivery primitives below.

use async_trait::async_trait;

use crate::errors::DeliveryError;
use crate::message::InboundMessage;
use crate::types::UserId;

// ----------------------------------------------------------------------------
// Transport Trait
// ----------------------------------------------------------------------------

/// Outbound delivery interface of the chat transport
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send plain text to a destination
    async fn send_text(&mut self, to: UserId, text: &str) -> Result<(), DeliveryError>;

    /// Deliver a copy of a message's content with sender metadata stripped,
    /// so the recipient cannot see who originated it
    async fn copy_content(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError>;

    /// Forward a reference to a message, preserving attribution to the
    /// original chat
    async fn forward_reference(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError>;

    /// Emit a lightweight liveness signal (typing indicator) to a destination
    async fn send_liveness(&mut self, to: UserId) -> Result<(), DeliveryError>;
}
