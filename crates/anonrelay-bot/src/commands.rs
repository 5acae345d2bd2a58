//! Command vocabulary of the bot
//!
//! Classifies inbound text as one of the recognized slash commands. Anything
//! that is not a command is a payload for the relay dispatcher; unknown
//! commands are ignored entirely.

// ----------------------------------------------------------------------------
// User-Visible Texts
// ----------------------------------------------------------------------------

/// Menu shown after start, connection, and disconnection events
pub const MENU: &str = "Anonymous chat bot\n\n\
Commands:\n\
/anon_start - find a partner\n\
/anon_next - next partner\n\
/anon_stop - stop chatting\n\
/status - show status\n";

pub const PARTNER_CONNECTED: &str = "Partner connected.";
pub const NEW_PARTNER_CONNECTED: &str = "New partner connected.";
pub const SEARCHING: &str = "Searching for partner...";
pub const PARTNER_DISCONNECTED: &str = "Partner disconnected.";
pub const LEFT_CHAT: &str = "You left the chat.";
pub const STATE_CLEARED: &str = "State cleared.";
pub const UNAUTHORIZED: &str = "Unauthorized.";

// ----------------------------------------------------------------------------
// Command Parsing
// ----------------------------------------------------------------------------

/// Recognized slash commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the menu
    Start,
    /// Echo the caller's own identifier
    MyId,
    /// Show the redacted configuration (admin)
    ShowConfig,
    /// Clear queue, pairings, and the snapshot (admin)
    ClearState,
    /// Find a partner
    AnonStart,
    /// Switch to the next partner
    AnonNext,
    /// Stop chatting
    AnonStop,
    /// Show connection status
    Status,
}

impl Command {
    /// Parse the leading token of a message as a command.
    ///
    /// Returns `None` for payload text and for unrecognized commands alike;
    /// the caller distinguishes the two with [`is_command`].
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        match first {
            "/start" => Some(Self::Start),
            "/myid" => Some(Self::MyId),
            "/show_config" => Some(Self::ShowConfig),
            "/clear_state" => Some(Self::ClearState),
            "/anon_start" => Some(Self::AnonStart),
            "/anon_next" => Some(Self::AnonNext),
            "/anon_stop" => Some(Self::AnonStop),
            "/status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Whether this command requires administrator authorization
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::ShowConfig | Self::ClearState)
    }
}

/// Whether the text is shaped like a command (known or not)
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
