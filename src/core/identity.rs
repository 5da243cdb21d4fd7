use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::error::LedgerError;

/// Opaque caller identity handed to the ledger by the transport.
/// The ledger only ever compares identities for equality. Deserialized
/// through `FromStr`, so stored identities cannot be blank either.
#[derive(Clone, Eq, PartialEq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Identity {
    id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Identity {
        Identity { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl FromStr for Identity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidIdentity(s.to_owned()));
        }
        Ok(Identity::new(trimmed))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity {}", self.id)
    }
}
