//! End-to-end engine scenarios
//!
//! Walks the matchmaker, state store, and dispatcher through the lifecycle
//! of real sessions, including restart recovery from the snapshot file.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anonrelay_core::{
    ChatTransport, DeliveryError, DispatchOutcome, EngineConfig, InboundMessage, Matchmaker,
    MessageKind, RelayDispatcher, SessionStatus, StateStore, TimeSource, Timestamp, UserId,
    CONNECT_PROMPT,
};

// ----------------------------------------------------------------------------
// Test Doubles
// ----------------------------------------------------------------------------

/// Controllable clock shared between test and dispatcher
#[derive(Debug, Clone, Default)]
struct MockTimeSource {
    current: Arc<AtomicU64>,
}

impl MockTimeSource {
    fn advance(&self, millis: u64) {
        self.current.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}

/// Outbound transport calls, recorded in order
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outbound {
    Text(UserId, String),
    Copy(UserId, i64),
    Forward(UserId, i64),
    Liveness(UserId),
}

#[derive(Default)]
struct RecordingTransport {
    calls: Vec<Outbound>,
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&mut self, to: UserId, text: &str) -> Result<(), DeliveryError> {
        self.calls.push(Outbound::Text(to, text.to_string()));
        Ok(())
    }

    async fn copy_content(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError> {
        self.calls.push(Outbound::Copy(to, message.message_id));
        Ok(())
    }

    async fn forward_reference(
        &mut self,
        to: UserId,
        message: &InboundMessage,
    ) -> Result<(), DeliveryError> {
        self.calls.push(Outbound::Forward(to, message.message_id));
        Ok(())
    }

    async fn send_liveness(&mut self, to: UserId) -> Result<(), DeliveryError> {
        self.calls.push(Outbound::Liveness(to));
        Ok(())
    }
}

fn user(id: i64) -> UserId {
    UserId::new(id)
}

// ----------------------------------------------------------------------------
// Session Lifecycle
// ----------------------------------------------------------------------------

#[test]
fn test_session_lifecycle_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut mm = Matchmaker::new(StateStore::new(dir.path().join("state.json")));

    // User 1 requests a partner: no partner, queue = [1]
    assert_eq!(mm.request_partner(user(1)), None);
    assert_eq!(mm.store().waiting().collect::<Vec<_>>(), vec![user(1)]);

    // User 2 requests a partner: matched with 1, queue drained
    assert_eq!(mm.request_partner(user(2)), Some(user(1)));
    assert_eq!(mm.store().queue_len(), 0);
    assert_eq!(mm.partner_of(user(1)), Some(user(2)));
    assert_eq!(mm.partner_of(user(2)), Some(user(1)));

    // User 1 ends the session: returns partner 2, table empty
    assert_eq!(mm.end_session(user(1)), Some(user(2)));
    assert_eq!(mm.store().session_count(), 0);
    assert_eq!(mm.store().queue_len(), 0);

    // User 2 requests again: back to waiting
    assert_eq!(mm.request_partner(user(2)), None);
    assert_eq!(mm.store().waiting().collect::<Vec<_>>(), vec![user(2)]);
}

#[test]
fn test_fifo_order_survives_interleaved_requests() {
    let dir = tempfile::tempdir().unwrap();
    let mut mm = Matchmaker::new(StateStore::new(dir.path().join("state.json")));

    assert_eq!(mm.request_partner(user(10)), None);
    assert_eq!(mm.request_partner(user(11)), None);
    // longest-waiting user is matched first
    assert_eq!(mm.request_partner(user(12)), Some(user(10)));
    assert_eq!(mm.request_partner(user(13)), Some(user(11)));
}

#[test]
fn test_status_tracks_engine_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut mm = Matchmaker::new(StateStore::new(dir.path().join("state.json")));

    assert_eq!(mm.status(user(1)), SessionStatus::Idle);
    mm.request_partner(user(1));
    assert_eq!(mm.status(user(1)), SessionStatus::Searching);
    mm.request_partner(user(2));
    assert_eq!(mm.status(user(1)), SessionStatus::Connected);
    assert_eq!(mm.status(user(2)), SessionStatus::Connected);
    mm.end_session(user(2));
    assert_eq!(mm.status(user(1)), SessionStatus::Idle);
}

// ----------------------------------------------------------------------------
// Restart Recovery
// ----------------------------------------------------------------------------

#[test]
fn test_sessions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let mut mm = Matchmaker::new(StateStore::restore(&path));
        mm.request_partner(user(1));
        mm.request_partner(user(2));
        mm.request_partner(user(3));
        // process exits here; every mutation already persisted
    }

    let mm = Matchmaker::new(StateStore::restore(&path));
    assert_eq!(mm.partner_of(user(1)), Some(user(2)));
    assert_eq!(mm.status(user(3)), SessionStatus::Searching);
}

#[test]
fn test_restart_with_corrupt_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "][ definitely not json").unwrap();

    let mm = Matchmaker::new(StateStore::restore(&path));
    assert_eq!(mm.store().queue_len(), 0);
    assert_eq!(mm.store().session_count(), 0);
}

// ----------------------------------------------------------------------------
// Dispatch Scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_photo_is_mirrored_while_unpaired() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        moderation_chat: Some(user(-1001)),
        state_file: dir.path().join("state.json"),
        ..Default::default()
    };
    let mut dispatcher = RelayDispatcher::new(&config, MockTimeSource::default());
    let mut mm = Matchmaker::new(StateStore::new(&config.state_file));
    let mut transport = RecordingTransport::default();

    let photo = InboundMessage::media(user(5), 21, MessageKind::Photo);
    dispatcher.dispatch(&mut transport, &mut mm, &photo).await;

    // mirrored regardless of pairing state, then prompted to connect
    assert_eq!(transport.calls[0], Outbound::Forward(user(-1001), 21));
    assert_eq!(
        transport.calls[1],
        Outbound::Text(user(5), CONNECT_PROMPT.to_string())
    );
}

#[tokio::test]
async fn test_text_while_unpaired_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        state_file: dir.path().join("state.json"),
        ..Default::default()
    };
    let mut dispatcher = RelayDispatcher::new(&config, MockTimeSource::default());
    let mut mm = Matchmaker::new(StateStore::new(&config.state_file));
    let mut transport = RecordingTransport::default();

    let msg = InboundMessage::text(user(9), 1, "anyone there?");
    let outcome = dispatcher.dispatch(&mut transport, &mut mm, &msg).await;

    assert_eq!(outcome, DispatchOutcome::Prompted);
    assert_eq!(mm.store().queue_len(), 0);
    assert_eq!(mm.store().session_count(), 0);
}

#[tokio::test]
async fn test_rate_limited_conversation_delivers_at_most_one_per_window() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        state_file: dir.path().join("state.json"),
        ..Default::default()
    };
    let clock = MockTimeSource::default();
    let mut dispatcher = RelayDispatcher::new(&config, clock.clone());
    let mut mm = Matchmaker::new(StateStore::new(&config.state_file));
    let mut transport = RecordingTransport::default();

    mm.request_partner(user(1));
    mm.request_partner(user(2));

    let burst: Vec<InboundMessage> = (0..3)
        .map(|i| InboundMessage::text(user(1), i, format!("msg {}", i)))
        .collect();

    assert_eq!(
        dispatcher.dispatch(&mut transport, &mut mm, &burst[0]).await,
        DispatchOutcome::Relayed
    );
    assert_eq!(
        dispatcher.dispatch(&mut transport, &mut mm, &burst[1]).await,
        DispatchOutcome::Throttled
    );

    clock.advance(1_300);
    assert_eq!(
        dispatcher.dispatch(&mut transport, &mut mm, &burst[2]).await,
        DispatchOutcome::Relayed
    );

    let delivered: Vec<&Outbound> = transport
        .calls
        .iter()
        .filter(|c| matches!(c, Outbound::Copy(..)))
        .collect();
    assert_eq!(
        delivered,
        vec![&Outbound::Copy(user(2), 0), &Outbound::Copy(user(2), 2)]
    );
}

#[tokio::test]
async fn test_both_directions_relay_independently() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        state_file: dir.path().join("state.json"),
        ..Default::default()
    };
    let mut dispatcher = RelayDispatcher::new(&config, MockTimeSource::default());
    let mut mm = Matchmaker::new(StateStore::new(&config.state_file));
    let mut transport = RecordingTransport::default();

    mm.request_partner(user(1));
    mm.request_partner(user(2));

    let from_1 = InboundMessage::text(user(1), 1, "ping");
    let from_2 = InboundMessage::text(user(2), 2, "pong");
    dispatcher.dispatch(&mut transport, &mut mm, &from_1).await;
    // user 2's budget is separate from user 1's
    let outcome = dispatcher.dispatch(&mut transport, &mut mm, &from_2).await;

    assert_eq!(outcome, DispatchOutcome::Relayed);
    assert_eq!(
        transport.calls,
        vec![Outbound::Copy(user(2), 1), Outbound::Copy(user(1), 2)]
    );
}
