//! # Principal Identifiers
//!
//! A principal is whoever invokes a registry operation. The host
//! environment authenticates the caller and hands the registry a verified
//! identifier; the registry only needs to compare and order them.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Verified identifier of a calling principal (an account or contract
/// address in the host's own format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Wrap a host-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the identifier is empty or contains
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, RegistryError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RegistryError::InvalidInput(
                "principal identifier must not be empty".into(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidInput(format!(
                "principal identifier contains whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
