//! Password Value Object
//!
//! Holds only the one-way encoded form. The clear text is consumed on
//! construction (and zeroized when it drops), so a `Password` can never
//! hand the raw input back.

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, PasswordHasher};

#[derive(Clone, PartialEq, Eq)]
pub struct Password(HashedPassword);

impl Password {
    /// Hash `raw` and keep only the result.
    pub fn create(
        raw: ClearTextPassword,
        hasher: &dyn PasswordHasher,
    ) -> Result<Self, PasswordHashError> {
        hasher.hash(&raw).map(Self)
    }

    /// Rehydrate from storage
    pub fn from_hashed(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// One-way check of a candidate against this password.
    pub fn matches(&self, raw: &ClearTextPassword, hasher: &dyn PasswordHasher) -> bool {
        hasher.verify(raw, &self.0)
    }

    pub fn hashed(&self) -> &HashedPassword {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password").field("hash", &"[HASH]").finish()
    }
}
