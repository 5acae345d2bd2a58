//! Console loopback transport
//!
//! Stands in for the external chat network during local operation and
//! automation: every outbound delivery is printed to stdout, tagged with its
//! destination. The relay copy deliberately omits the sender, matching the
//! anonymity contract of the trait.

use async_trait::async_trait;

use anonrelay_core::{ChatTransport, DeliveryError, InboundMessage, MessageKind, UserId};

// ----------------------------------------------------------------------------
// Console Transport
// ----------------------------------------------------------------------------

/// Transport that prints outbound traffic to stdout
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

fn kind_tag(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Text => "text",
        MessageKind::Photo => "photo",
        MessageKind::Video => "video",
        MessageKind::Audio => "audio",
        MessageKind::Voice => "voice",
        MessageKind::Document => "document",
        MessageKind::Sticker => "sticker",
        MessageKind::Animation => "animation",
        MessageKind::VideoNote => "video note",
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_text(&mut self, to: UserId, text: &str) -> Result<(), DeliveryError> {
        println!("-> {}: {}", to, text);
        Ok(())
    }

    async fn copy_content(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError> {
        // sender metadata stripped: only content reaches the partner
        match &message.text {
            Some(text) if message.kind == MessageKind::Text => {
                println!("-> {}: {}", to, text);
            }
            Some(caption) => {
                println!("-> {}: [{}] {}", to, kind_tag(message.kind), caption);
            }
            None => {
                println!("-> {}: [{}]", to, kind_tag(message.kind));
            }
        }
        Ok(())
    }

    async fn forward_reference(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError> {
        // attribution preserved for the moderation destination
        println!(
            "-> {}: [forwarded {} {} from chat {}]",
            to,
            kind_tag(message.kind),
            message.message_id,
            message.chat
        );
        Ok(())
    }

    async fn send_liveness(&mut self, to: UserId) -> Result<(), DeliveryError> {
        println!("-> {}: [typing]", to);
        Ok(())
    }
}
