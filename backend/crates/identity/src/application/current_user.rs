//! Current User Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::application::services::IdentityServices;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{Email, Nickname, Provider};
use crate::error::{IdentityError, IdentityResult};

pub struct UserProfile {
    pub user_id: UserId,
    pub email: Email,
    pub nickname: Nickname,
    pub provider: Option<Provider>,
    pub created_at: DateTime<Utc>,
}

pub struct CurrentUserUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    services: Arc<IdentityServices>,
}

impl<S> CurrentUserUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, services: Arc<IdentityServices>) -> Self {
        Self { store, services }
    }

    /// Verify `token` and load the account it names.
    pub async fn execute(&self, token: &str) -> IdentityResult<UserProfile> {
        let subject = self.services.tokens.subject(token)?;
        let user_id: UserId = subject.parse().map_err(|_| IdentityError::Unauthenticated)?;
        self.load(&user_id).await
    }

    /// Load the account of an already verified subject.
    pub async fn load(&self, user_id: &UserId) -> IdentityResult<UserProfile> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        Ok(UserProfile {
            user_id: user.user_id,
            email: user.email,
            nickname: user.nickname,
            provider: user.provider,
            created_at: user.created_at,
        })
    }
}
