//! # sovid-registry: Identity, Credential and Disclosure Registries
//!
//! Implements the state-transition logic of the registry: one identity per
//! principal, bounded credential lists, issuer-only revocation, and the
//! two-phase initiate → approve disclosure workflow.
//!
//! ## Components
//!
//! - **IdentityRegistry** (`identity.rs`): registration, key rotation,
//!   self-revocation, and the bounded credential-hash list.
//!
//! - **CredentialRegistry** (`credential.rs`): issuance, expiry, and
//!   issuer-only revocation.
//!
//! - **DisclosureRegistry** (`disclosure.rs`): `Unapproved → Approved`,
//!   proof binding, and verification.
//!
//! - **AccessGuard** (`guard.rs`): derives the acting principal from the
//!   [`CallContext`] and performs owner and issuer checks.
//!
//! - **StateStore** (`store.rs`): transactional get/put over the three
//!   keyed registries. A failing operation leaves no trace.
//!
//! - **Registry** (`registry.rs`): the public operation surface. Resolves
//!   the caller, reads the clock, runs one operation inside one
//!   transaction, and logs the outcome.
//!
//! ## Control Flow
//!
//! Every mutating operation (a) resolves the caller, (b) validates raw
//! inputs, (c) loads records, (d) checks entity invariants and
//! authorization, (e) stages updated records. The store commits the staged
//! writes only if every step succeeded. Reads bypass (a) and (e).

pub mod config;
pub mod credential;
pub mod disclosure;
pub mod event;
pub mod guard;
pub mod identity;
pub mod registry;
pub mod store;

pub use config::{ConfigError, RegistryConfig};
pub use credential::{Credential, CredentialRegistry, CredentialStatus};
pub use disclosure::{DisclosureRegistry, DisclosureRequest, DisclosureState};
pub use event::{EventJournal, EventKind, RegistryEvent};
pub use guard::{AccessGuard, CallContext};
pub use identity::{Identity, IdentityRegistry};
pub use registry::Registry;
pub use store::{InMemoryStore, RegistryState, StateStore, Transaction};

pub use sovid_core::{ErrorCode, RegistryError};
