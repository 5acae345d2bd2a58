//! Durable state store for the waiting queue and pairing table
//!
//! The store is the sole owner and sole mutator of both structures. Every
//! mutation goes through an invariant-checking operation and is followed by a
//! best-effort snapshot write; a failed write is logged and the in-memory
//! state remains authoritative for the running process.
//!
//! Invariants maintained here:
//! - the pairing table is symmetric and irreflexive
//! - a user appears as a key at most once
//! - the queue holds no duplicates and is disjoint from the pairing table

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::types::UserId;

// ----------------------------------------------------------------------------
// Persisted Snapshot
// ----------------------------------------------------------------------------

/// Serialized form of the queue and pairing table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    queue: Vec<UserId>,
    pairs: Vec<(UserId, UserId)>,
}

impl Snapshot {
    /// Check the invariants a well-formed snapshot must satisfy
    fn validate(&self) -> Result<(), StoreError> {
        let pairs: HashMap<UserId, UserId> = self.pairs.iter().copied().collect();
        if pairs.len() != self.pairs.len() {
            return Err(StoreError::InvalidSnapshot {
                reason: "duplicate pairing key".into(),
            });
        }
        for (&a, &b) in &pairs {
            if a == b {
                return Err(StoreError::InvalidSnapshot {
                    reason: format!("user {} paired with itself", a),
                });
            }
            if pairs.get(&b) != Some(&a) {
                return Err(StoreError::InvalidSnapshot {
                    reason: format!("pairing {} -> {} is not symmetric", a, b),
                });
            }
        }
        let mut seen = hashbrown::HashSet::new();
        for user in &self.queue {
            if !seen.insert(*user) {
                return Err(StoreError::InvalidSnapshot {
                    reason: format!("user {} queued twice", user),
                });
            }
            if pairs.contains_key(user) {
                return Err(StoreError::InvalidSnapshot {
                    reason: format!("user {} is both queued and paired", user),
                });
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// State Store
// ----------------------------------------------------------------------------

/// Owner of the waiting queue and pairing table with durable persistence
#[derive(Debug)]
pub struct StateStore {
    /// FIFO queue of users awaiting a partner
    queue: VecDeque<UserId>,
    /// Symmetric pairing relation, both directions present
    pairs: HashMap<UserId, UserId>,
    /// Snapshot location
    state_file: PathBuf,
}

impl StateStore {
    /// Create an empty store persisting to the given path
    pub fn new<P: Into<PathBuf>>(state_file: P) -> Self {
        Self {
            queue: VecDeque::new(),
            pairs: HashMap::new(),
            state_file: state_file.into(),
        }
    }

    /// Load the store from its snapshot, called once at process start.
    ///
    /// A missing snapshot is a cold start; a corrupt or invariant-violating
    /// snapshot degrades to an empty store with a warning. Never fails.
    pub fn restore<P: Into<PathBuf>>(state_file: P) -> Self {
        let state_file = state_file.into();
        match Self::try_restore(&state_file) {
            Ok(Some(store)) => {
                info!(
                    queued = store.queue.len(),
                    sessions = store.pairs.len() / 2,
                    "loaded state snapshot"
                );
                store
            }
            Ok(None) => Self::new(state_file),
            Err(e) => {
                warn!(error = %e, "failed to load state snapshot, starting empty");
                Self::new(state_file)
            }
        }
    }

    fn try_restore(state_file: &Path) -> Result<Option<Self>, StoreError> {
        if !state_file.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(state_file)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        snapshot.validate()?;
        Ok(Some(Self {
            queue: snapshot.queue.into_iter().collect(),
            pairs: snapshot.pairs.into_iter().collect(),
            state_file: state_file.to_path_buf(),
        }))
    }

    /// Serialize the current queue and pairing table to the snapshot file
    pub fn persist(&self) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            queue: self.queue.iter().copied().collect(),
            pairs: self.pairs.iter().map(|(&a, &b)| (a, b)).collect(),
        };
        let contents = serde_json::to_string(&snapshot)?;
        std::fs::write(&self.state_file, contents)?;
        Ok(())
    }

    /// Persist with the log-and-continue policy used after every mutation
    fn persist_after_mutation(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist state snapshot");
        }
    }

    /// Clear queue and pairing table and delete the snapshot file
    pub fn reset(&mut self) {
        self.queue.clear();
        self.pairs.clear();
        match std::fs::remove_file(&self.state_file) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "failed to delete state snapshot"),
        }
    }

    // ------------------------------------------------------------------------
    // Pairing Table Operations
    // ------------------------------------------------------------------------

    /// Create a symmetric pairing between two users.
    ///
    /// Rejects self-pairing and endpoints that already have a partner. Both
    /// users are removed from the queue as part of the same mutation.
    pub fn pair(&mut self, a: UserId, b: UserId) -> Result<(), StoreError> {
        if a == b {
            return Err(StoreError::SelfPairing { user: a });
        }
        if self.pairs.contains_key(&a) {
            return Err(StoreError::AlreadyPaired { user: a });
        }
        if self.pairs.contains_key(&b) {
            return Err(StoreError::AlreadyPaired { user: b });
        }
        self.queue.retain(|&u| u != a && u != b);
        self.pairs.insert(a, b);
        self.pairs.insert(b, a);
        self.persist_after_mutation();
        Ok(())
    }

    /// Remove a user's pairing in both directions, returning the former partner
    pub fn unpair(&mut self, user: UserId) -> Option<UserId> {
        let partner = self.pairs.remove(&user)?;
        self.pairs.remove(&partner);
        self.persist_after_mutation();
        Some(partner)
    }

    /// Look up a user's current partner
    pub fn partner_of(&self, user: UserId) -> Option<UserId> {
        self.pairs.get(&user).copied()
    }

    // ------------------------------------------------------------------------
    // Queue Operations
    // ------------------------------------------------------------------------

    /// Append a user to the tail of the waiting queue
    pub fn enqueue(&mut self, user: UserId) -> Result<(), StoreError> {
        if self.pairs.contains_key(&user) {
            return Err(StoreError::AlreadyPaired { user });
        }
        if self.queue.contains(&user) {
            return Err(StoreError::AlreadyQueued { user });
        }
        self.queue.push_back(user);
        self.persist_after_mutation();
        Ok(())
    }

    /// Pop the longest-waiting user from the head of the queue
    pub fn pop_waiting(&mut self) -> Option<UserId> {
        let user = self.queue.pop_front()?;
        self.persist_after_mutation();
        Some(user)
    }

    /// Remove a user from the queue wherever they are, if present
    pub fn remove_queued(&mut self, user: UserId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&u| u != user);
        if self.queue.len() != before {
            self.persist_after_mutation();
            true
        } else {
            false
        }
    }

    /// Whether a user is currently waiting in the queue
    pub fn is_queued(&self, user: UserId) -> bool {
        self.queue.contains(&user)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Number of users waiting for a partner
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of active sessions (pairs of users)
    pub fn session_count(&self) -> usize {
        self.pairs.len() / 2
    }

    /// Users currently waiting, in FIFO order
    pub fn waiting(&self) -> impl Iterator<Item = UserId> + '_ {
        self.queue.iter().copied()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
