//! User Entity
//!
//! Local accounts carry a password; federated accounts carry the provider
//! they first signed in with and no password.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{Email, Nickname, Password, Provider};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Normalized, unique
    pub email: Email,
    /// Unique display name
    pub nickname: Nickname,
    /// `None` for accounts created through a social provider
    pub password: Option<Password>,
    pub provider: Option<Provider>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new email/password account
    pub fn new_local(email: Email, nickname: Nickname, password: Password, now: DateTime<Utc>) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            nickname,
            password: Some(password),
            provider: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an account on first federated sign-in
    pub fn new_social(
        email: Email,
        nickname: Nickname,
        provider: Provider,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            nickname,
            password: None,
            provider: Some(provider),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}
