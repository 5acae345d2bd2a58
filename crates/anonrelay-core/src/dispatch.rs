//! Relay decision logic for non-command messages
//!
//! Classifies every inbound payload from a user: mirror media to the
//! moderation destination, relay to the current partner, or prompt the user
//! to connect. The dispatcher never queues anyone as a side effect.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::matchmaker::Matchmaker;
use crate::message::InboundMessage;
use crate::notifier::AdminNotifier;
use crate::rate_limiter::RelayRateLimiter;
use crate::transport::ChatTransport;
use crate::types::{TimeSource, UserId};

/// Prompt sent to users who message without a partner
pub const CONNECT_PROMPT: &str = "You are not connected to a partner. Use /anon_start";

// ----------------------------------------------------------------------------
// Dispatch Outcome
// ----------------------------------------------------------------------------

/// How the dispatcher routed a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered to the partner
    Relayed,
    /// Partner delivery failed; reported to the admin notifier
    RelayFailed,
    /// Dropped silently by the rate limiter
    Throttled,
    /// No partner; the user was prompted to connect
    Prompted,
}

// ----------------------------------------------------------------------------
// Relay Dispatcher
// ----------------------------------------------------------------------------

/// Routes inbound payloads according to pairing state and rate limits
#[derive(Debug)]
pub struct RelayDispatcher<C: TimeSource> {
    limiter: RelayRateLimiter<C>,
    notifier: AdminNotifier,
    moderation_chat: Option<UserId>,
}

impl<C: TimeSource> RelayDispatcher<C> {
    /// Create a dispatcher from engine configuration
    pub fn new(config: &EngineConfig, time_source: C) -> Self {
        Self {
            limiter: RelayRateLimiter::with_interval(config.rate_limit_ms, time_source),
            notifier: AdminNotifier::new(config.admins.iter().copied()),
            moderation_chat: config.moderation_chat,
        }
    }

    /// Access the admin notifier (shared with the command layer)
    pub fn notifier(&self) -> &AdminNotifier {
        &self.notifier
    }

    /// Route one inbound non-command message.
    ///
    /// All failures are handled locally: delivery errors go to the admin
    /// notifier, never back to the sending user.
    pub async fn dispatch<T: ChatTransport>(
        &mut self,
        transport: &mut T,
        matchmaker: &mut Matchmaker,
        message: &InboundMessage,
    ) -> DispatchOutcome {
        self.mirror_attachment(transport, message).await;

        let sender = message.sender;
        if let Some(partner) = matchmaker.partner_of(sender) {
            if self.limiter.is_throttled(sender) {
                // Silent drop; the liveness signal is best-effort only.
                if let Err(e) = transport.send_liveness(sender).await {
                    debug!(%sender, error = %e, "liveness signal failed");
                }
                return DispatchOutcome::Throttled;
            }
            return match transport.copy_content(partner, message).await {
                Ok(()) => {
                    debug!(%sender, %partner, "relayed message");
                    DispatchOutcome::Relayed
                }
                Err(e) => {
                    warn!(%sender, %partner, error = %e, "relay failed");
                    self.notifier
                        .notify(transport, &format!("Relay failed: {}", e))
                        .await;
                    DispatchOutcome::RelayFailed
                }
            };
        }

        if let Err(e) = transport.send_text(sender, CONNECT_PROMPT).await {
            debug!(%sender, error = %e, "connect prompt failed");
        }
        DispatchOutcome::Prompted
    }

    /// Mirror a media attachment to the moderation destination.
    ///
    /// Independent of pairing state and charged to no rate-limit budget.
    async fn mirror_attachment<T: ChatTransport>(
        &mut self,
        transport: &mut T,
        message: &InboundMessage,
    ) {
        let Some(destination) = self.moderation_chat else {
            return;
        };
        if !message.has_attachment() {
            return;
        }
        if let Err(e) = transport.forward_reference(destination, message).await {
            warn!(sender = %message.sender, error = %e, "moderation mirror failed");
            self.notifier
                .notify(transport, &format!("Moderation mirror failed: {}", e))
                .await;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
