//! Matchmaking over the state store
//!
//! Turns a user's connection intent into either an immediate partner or
//! queue placement. The queue is strictly FIFO: the longest-waiting user is
//! matched first.

use tracing::{debug, warn};

use crate::store::StateStore;
use crate::types::{SessionStatus, UserId};

// ----------------------------------------------------------------------------
// Matchmaker
// ----------------------------------------------------------------------------

/// Maps connection intents onto the queue and pairing table
#[derive(Debug)]
pub struct Matchmaker {
    store: StateStore,
}

impl Matchmaker {
    /// Create a matchmaker over a restored state store
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Request a partner for the given user.
    ///
    /// Idempotent while paired: returns the existing partner unchanged.
    /// Otherwise matches against the queue head or enqueues the user,
    /// returning `None` when no partner is available yet.
    pub fn request_partner(&mut self, user: UserId) -> Option<UserId> {
        if let Some(partner) = self.store.partner_of(user) {
            return Some(partner);
        }

        // Defensive cleanup: a queued user retrying their intent must not
        // be matched against themselves or queued twice.
        self.store.remove_queued(user);

        if let Some(other) = self.store.pop_waiting() {
            match self.store.pair(user, other) {
                Ok(()) => {
                    debug!(%user, partner = %other, "matched");
                    return Some(other);
                }
                Err(e) => {
                    // Unreachable while invariants hold; drop the stale
                    // queue entry and keep the requester waiting.
                    warn!(%user, error = %e, "pairing against queue head failed");
                }
            }
        }

        if let Err(e) = self.store.enqueue(user) {
            warn!(%user, error = %e, "enqueue failed");
            return None;
        }
        debug!(%user, "queued for a partner");
        None
    }

    /// End the user's session, returning the former partner when one existed.
    ///
    /// Also removes the user from the waiting queue, covering the
    /// cancel-while-searching case.
    pub fn end_session(&mut self, user: UserId) -> Option<UserId> {
        let former = self.store.unpair(user);
        self.store.remove_queued(user);
        if let Some(partner) = former {
            debug!(%user, %partner, "session ended");
        }
        former
    }

    /// End the current session unconditionally and request a new partner.
    ///
    /// Returns the former partner and the new partner, either of which may be
    /// absent. Notifying all affected users is the caller's responsibility.
    pub fn cycle_session(&mut self, user: UserId) -> (Option<UserId>, Option<UserId>) {
        let former = self.end_session(user);
        let next = self.request_partner(user);
        (former, next)
    }

    /// Read-only status of a user
    pub fn status(&self, user: UserId) -> SessionStatus {
        if self.store.partner_of(user).is_some() {
            SessionStatus::Connected
        } else if self.store.is_queued(user) {
            SessionStatus::Searching
        } else {
            SessionStatus::Idle
        }
    }

    /// Current partner of a user, if any
    pub fn partner_of(&self, user: UserId) -> Option<UserId> {
        self.store.partner_of(user)
    }

    /// Access the underlying store (administrative reset, diagnostics)
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// Shared access to the underlying store
    pub fn store(&self) -> &StateStore {
        &self.store
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
