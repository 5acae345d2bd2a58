//! Application wiring: command layer over the relay engine
//!
//! Owns the transport, matchmaker, and dispatcher, and routes every inbound
//! event either to a command handler or to the relay dispatcher. Events are
//! processed one at a time, so all engine mutations are naturally serialized.

use tracing::{debug, info};

use anonrelay_core::{
    ChatTransport, DispatchOutcome, EngineConfig, InboundMessage, Matchmaker, MessageKind,
    RelayDispatcher, SessionStatus, StateStore, SystemTimeSource, UserId,
};

use crate::commands::{self, Command};
use crate::config::AppConfig;
use crate::error::Result;

// ----------------------------------------------------------------------------
// Bot Application
// ----------------------------------------------------------------------------

/// The assembled bot: engine components plus a transport
pub struct BotApp<T: ChatTransport> {
    config: AppConfig,
    engine_config: EngineConfig,
    matchmaker: Matchmaker,
    dispatcher: RelayDispatcher<SystemTimeSource>,
    transport: T,
    next_message_id: i64,
}

impl<T: ChatTransport> BotApp<T> {
    /// Restore engine state and assemble the application
    pub fn new(config: AppConfig, transport: T) -> Self {
        let engine_config = config.engine_config();
        let store = StateStore::restore(&engine_config.state_file);
        let matchmaker = Matchmaker::new(store);
        let dispatcher = RelayDispatcher::new(&engine_config, SystemTimeSource);
        info!(
            sessions = matchmaker.store().session_count(),
            queued = matchmaker.store().queue_len(),
            "engine ready"
        );
        Self {
            config,
            engine_config,
            matchmaker,
            dispatcher,
            transport,
            next_message_id: 0,
        }
    }

    /// Handle one console input line of the form `<user-id> <text>`.
    ///
    /// Text starting with `@photo`, `@video`, and friends simulates a media
    /// attachment with an optional caption.
    pub async fn handle_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let Some((id_part, rest)) = line.split_once(char::is_whitespace) else {
            debug!(%line, "ignoring input without a payload");
            return Ok(());
        };
        let Ok(user) = id_part.parse::<UserId>() else {
            debug!(%line, "ignoring input without a numeric user id");
            return Ok(());
        };
        self.handle_event(user, rest.trim()).await;
        Ok(())
    }

    /// Route one inbound event: command or relay payload
    pub async fn handle_event(&mut self, user: UserId, text: &str) {
        if commands::is_command(text) {
            match Command::parse(text) {
                Some(cmd) => self.handle_command(user, cmd).await,
                // unknown commands get no reply, matching the transport's
                // command-handler registration model
                None => debug!(%user, %text, "ignoring unknown command"),
            }
            return;
        }

        let message = self.inbound_from_text(user, text);
        let outcome = self
            .dispatcher
            .dispatch(&mut self.transport, &mut self.matchmaker, &message)
            .await;
        if outcome == DispatchOutcome::Prompted {
            self.send(user, commands::MENU).await;
        }
    }

    /// Handle a recognized command for a user
    pub async fn handle_command(&mut self, user: UserId, command: Command) {
        if command.requires_admin() && !self.engine_config.is_admin(user) {
            self.send(user, commands::UNAUTHORIZED).await;
            return;
        }

        match command {
            Command::Start => {
                self.send(user, commands::MENU).await;
            }
            Command::MyId => {
                let id = user.to_string();
                self.send(user, &id).await;
            }
            Command::ShowConfig => {
                let view = serde_json::to_string_pretty(&self.config.redacted())
                    .unwrap_or_else(|_| "{}".to_string());
                self.send(user, &view).await;
            }
            Command::ClearState => {
                self.matchmaker.store_mut().reset();
                self.send(user, commands::STATE_CLEARED).await;
                self.send(user, commands::MENU).await;
            }
            Command::AnonStart => match self.matchmaker.request_partner(user) {
                Some(partner) => {
                    self.send(user, commands::PARTNER_CONNECTED).await;
                    self.send(partner, commands::PARTNER_CONNECTED).await;
                    self.send(user, commands::MENU).await;
                    self.send(partner, commands::MENU).await;
                }
                None => {
                    self.send(user, commands::SEARCHING).await;
                    self.send(user, commands::MENU).await;
                }
            },
            Command::AnonNext => {
                let (former, next) = self.matchmaker.cycle_session(user);
                if let Some(former) = former {
                    self.send(former, commands::PARTNER_DISCONNECTED).await;
                    self.send(former, commands::MENU).await;
                }
                match next {
                    Some(partner) => {
                        self.send(user, commands::NEW_PARTNER_CONNECTED).await;
                        self.send(partner, commands::NEW_PARTNER_CONNECTED).await;
                        self.send(user, commands::MENU).await;
                        self.send(partner, commands::MENU).await;
                    }
                    None => {
                        self.send(user, commands::SEARCHING).await;
                        self.send(user, commands::MENU).await;
                    }
                }
            }
            Command::AnonStop => {
                if let Some(former) = self.matchmaker.end_session(user) {
                    self.send(former, commands::PARTNER_DISCONNECTED).await;
                    self.send(former, commands::MENU).await;
                }
                self.send(user, commands::LEFT_CHAT).await;
                self.send(user, commands::MENU).await;
            }
            Command::Status => {
                let text = match self.matchmaker.status(user) {
                    SessionStatus::Connected => "Connected",
                    SessionStatus::Searching => "Waiting",
                    SessionStatus::Idle => "Not in chat",
                };
                self.send(user, text).await;
                self.send(user, commands::MENU).await;
            }
        }
    }

    /// Access the matchmaker (status queries, tests)
    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    /// Access the transport (tests)
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Best-effort user-facing send; failures are logged only
    async fn send(&mut self, to: UserId, text: &str) {
        if let Err(e) = self.transport.send_text(to, text).await {
            debug!(%to, error = %e, "send failed");
        }
    }

    /// Build an inbound message, decoding media simulation tags
    fn inbound_from_text(&mut self, user: UserId, text: &str) -> InboundMessage {
        self.next_message_id += 1;
        let message_id = self.next_message_id;

        let (kind, remainder) = match text.split_whitespace().next() {
            Some(tag) => match media_kind(tag) {
                Some(kind) => (kind, text[tag.len()..].trim()),
                None => (MessageKind::Text, text),
            },
            None => (MessageKind::Text, text),
        };

        InboundMessage {
            sender: user,
            chat: user,
            message_id,
            kind,
            text: if remainder.is_empty() {
                None
            } else {
                Some(remainder.to_string())
            },
        }
    }
}

/// Map a simulation tag to a media kind
fn media_kind(tag: &str) -> Option<MessageKind> {
    match tag {
        "@photo" => Some(MessageKind::Photo),
        "@video" => Some(MessageKind::Video),
        "@audio" => Some(MessageKind::Audio),
        "@voice" => Some(MessageKind::Voice),
        "@document" => Some(MessageKind::Document),
        "@sticker" => Some(MessageKind::Sticker),
        "@animation" => Some(MessageKind::Animation),
        "@videonote" => Some(MessageKind::VideoNote),
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
