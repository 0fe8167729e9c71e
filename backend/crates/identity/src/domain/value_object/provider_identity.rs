//! Federated identity value types

use serde_json::{Map, Value};
use std::fmt;

use super::email::Email;
use super::nickname::Nickname;
use super::provider::Provider;

/// Provider-independent user shape handed to the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardUser {
    pub email: Email,
    pub nickname: Nickname,
}

/// Result of a completed authorization-code flow.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub provider: Provider,
    /// Raw user-info document as returned by the provider
    pub raw: Map<String, Value>,
    pub standard: StandardUser,
}

/// Access token issued by an upstream provider. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderAccessToken(String);

impl ProviderAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProviderAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProviderAccessToken")
            .field(&"[REDACTED]")
            .finish()
    }
}
