//! # Event Journal
//!
//! Every committed mutation appends one [`RegistryEvent`]. Events are
//! staged inside the operation's transaction, so an aborted operation
//! never leaves an event behind.
//!
//! The journal is bounded: once `capacity` events are retained, each new
//! event evicts the oldest and increments the `dropped` counter.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use sovid_core::{LedgerTime, PrincipalId};

use crate::config::RegistryConfig;

// ─── Event Kind ──────────────────────────────────────────────────────

/// What a committed mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A principal registered its identity.
    IdentityRegistered,
    /// An owner replaced its identity hash and public key.
    IdentityUpdated,
    /// An owner permanently froze its identity.
    IdentityRevoked,
    /// A credential was issued and appended to the issuer's list.
    CredentialIssued,
    /// An issuer revoked one of its credentials.
    CredentialRevoked,
    /// A disclosure request was opened.
    DisclosureInitiated,
    /// An identity owner approved a disclosure request.
    DisclosureApproved,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::IdentityRegistered => "IDENTITY_REGISTERED",
            Self::IdentityUpdated => "IDENTITY_UPDATED",
            Self::IdentityRevoked => "IDENTITY_REVOKED",
            Self::CredentialIssued => "CREDENTIAL_ISSUED",
            Self::CredentialRevoked => "CREDENTIAL_REVOKED",
            Self::DisclosureInitiated => "DISCLOSURE_INITIATED",
            Self::DisclosureApproved => "DISCLOSURE_APPROVED",
        };
        f.write_str(s)
    }
}

// ─── Event ───────────────────────────────────────────────────────────

/// Record of one committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// What happened.
    pub kind: EventKind,
    /// The principal whose call caused it.
    pub actor: PrincipalId,
    /// Key of the affected record, in its display form.
    pub subject: String,
    /// Ledger time of the operation.
    pub at: LedgerTime,
}

impl RegistryEvent {
    /// Build an event for `subject`.
    pub fn new(
        kind: EventKind,
        actor: &PrincipalId,
        subject: impl std::fmt::Display,
        at: LedgerTime,
    ) -> Self {
        Self {
            kind,
            actor: actor.clone(),
            subject: subject.to_string(),
            at,
        }
    }
}

// ─── Journal ─────────────────────────────────────────────────────────

/// Bounded, ordered log of committed events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventJournal {
    enabled: bool,
    capacity: usize,
    dropped: u64,
    events: VecDeque<RegistryEvent>,
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl EventJournal {
    /// Create an empty journal using the configured policy.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            enabled: config.journal_enabled,
            capacity: config.journal_capacity(),
            dropped: 0,
            events: VecDeque::new(),
        }
    }

    /// Append `event`, evicting the oldest entry if full. No-op when the
    /// journal is disabled.
    pub fn append(&mut self, event: RegistryEvent) {
        if !self.enabled {
            return;
        }
        while self.events.len() >= self.capacity.max(1) {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &RegistryEvent> {
        self.events.iter()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events evicted so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Whether events are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
