//! In-memory user store
//!
//! Process-local adapter for the user-store port. Data lives as long as the
//! process does.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use platform::password::HashedPassword;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{Email, Nickname, Password};
use crate::error::{IdentityError, IdentityResult};

/// Retired hashes kept per user
const HISTORY_CAPACITY: usize = 24;

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    /// Retired hashes, most recent first
    history: HashMap<UserId, Vec<HashedPassword>>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_nickname(&self, nickname: &Nickname) -> IdentityResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.nickname == nickname).cloned())
    }

    async fn create(&self, user: &User) -> IdentityResult<()> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(IdentityError::EmailTaken);
        }
        if state.users.values().any(|u| u.nickname == user.nickname) {
            return Err(IdentityError::NicknameTaken);
        }

        state.users.insert(user.user_id, user.clone());
        tracing::debug!(user_id = %user.user_id, "User stored");
        Ok(())
    }

    async fn update_password_hash(&self, user_id: &UserId, password: &Password) -> IdentityResult<()> {
        let mut state = self.state.write().await;

        let user = state.users.get_mut(user_id).ok_or(IdentityError::UserNotFound)?;
        let previous = user.password.replace(password.clone());
        user.updated_at = Utc::now();

        if let Some(previous) = previous {
            let history = state.history.entry(*user_id).or_default();
            history.insert(0, previous.hashed().clone());
            history.truncate(HISTORY_CAPACITY);
        }
        Ok(())
    }

    async fn password_history(&self, user_id: &UserId, limit: usize) -> IdentityResult<Vec<HashedPassword>> {
        let state = self.state.read().await;
        let user = state.users.get(user_id).ok_or(IdentityError::UserNotFound)?;

        let current = user.password.iter().map(|p| p.hashed().clone());
        let retired = state.history.get(user_id).into_iter().flatten().cloned();

        Ok(current.chain(retired).take(limit).collect())
    }
}
