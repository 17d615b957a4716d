//! # Access Guard
//!
//! The host environment authenticates each invocation and supplies the
//! verified caller in a [`CallContext`]. The guard turns that context into
//! the acting principal and answers the two authorization questions every
//! mutating operation asks: "does this principal own a live identity?" and
//! "did this principal issue this credential?".

use sovid_core::{PrincipalId, RegistryError};

use crate::credential::Credential;
use crate::identity::Identity;
use crate::store::Transaction;

/// Per-invocation execution context supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    caller: PrincipalId,
}

impl CallContext {
    /// Context for a call made by an already authenticated `caller`.
    pub fn new(caller: PrincipalId) -> Self {
        Self { caller }
    }

    /// The verified caller.
    pub fn caller(&self) -> &PrincipalId {
        &self.caller
    }
}

/// Authorization checks shared by all registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// The principal on whose behalf the operation acts.
    pub fn acting_principal(ctx: &CallContext) -> &PrincipalId {
        ctx.caller()
    }

    /// Load `principal`'s identity and require it to be unrevoked.
    ///
    /// # Errors
    ///
    /// `IdentityNotFound` if no identity exists; `UnauthorizedAccess` if it
    /// is revoked.
    pub fn active_identity(
        txn: &Transaction<'_>,
        principal: &PrincipalId,
    ) -> Result<Identity, RegistryError> {
        let identity = txn
            .identity(principal)
            .ok_or_else(|| RegistryError::IdentityNotFound(principal.to_string()))?;
        if identity.is_revoked() {
            return Err(RegistryError::UnauthorizedAccess(format!(
                "identity of {principal} is revoked"
            )));
        }
        Ok(identity)
    }

    /// Require `principal` to be the issuer of `credential`.
    pub fn require_issuer(
        credential: &Credential,
        principal: &PrincipalId,
    ) -> Result<(), RegistryError> {
        if credential.issuer() != principal {
            return Err(RegistryError::UnauthorizedAccess(format!(
                "{principal} is not the issuer"
            )));
        }
        Ok(())
    }
}
