//! Inbound message model at the transport boundary

use serde::{Deserialize, Serialize};

use crate::types::UserId;

// ----------------------------------------------------------------------------
// Message Kind
// ----------------------------------------------------------------------------

/// Content kind of an inbound message
///
/// Everything except `Text` counts as a media attachment for moderation
/// mirroring purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Photo,
    Video,
    Audio,
    Voice,
    Document,
    Sticker,
    Animation,
    VideoNote,
}

impl MessageKind {
    /// Whether this kind carries a binary/content payload
    pub fn is_media(&self) -> bool {
        !matches!(self, MessageKind::Text)
    }
}

// ----------------------------------------------------------------------------
// Inbound Message
// ----------------------------------------------------------------------------

/// A non-command message delivered by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender's user identifier
    pub sender: UserId,
    /// Originating chat (equals sender in one-on-one chats)
    pub chat: UserId,
    /// Transport-assigned message identifier within the chat
    pub message_id: i64,
    /// Content kind
    pub kind: MessageKind,
    /// Text or caption, when present
    pub text: Option<String>,
}

impl InboundMessage {
    /// Create a plain text message from a user's own chat
    pub fn text(sender: UserId, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            sender,
            chat: sender,
            message_id,
            kind: MessageKind::Text,
            text: Some(text.into()),
        }
    }

    /// Create a media message without a caption
    pub fn media(sender: UserId, message_id: i64, kind: MessageKind) -> Self {
        Self {
            sender,
            chat: sender,
            message_id,
            kind,
            text: None,
        }
    }

    /// Whether the message carries a media attachment
    pub fn has_attachment(&self) -> bool {
        self.kind.is_media()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
