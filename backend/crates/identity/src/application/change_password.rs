//! Change Password Use Case
//!
//! The new password must be strong and must not match the current one or
//! any of the recent ones.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::services::IdentityServices;
use crate::domain::repository::UserStore;
use crate::domain::value_object::Password;
use crate::error::{IdentityError, IdentityResult};

pub struct ChangePasswordInput {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    services: Arc<IdentityServices>,
}

impl<S> ChangePasswordUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, services: Arc<IdentityServices>) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> IdentityResult<()> {
        let current = ClearTextPassword::new(input.current_password);
        let candidate = ClearTextPassword::new(input.new_password);

        let user = self
            .store
            .find_by_id(&input.user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        // Social-only accounts have nothing to verify against
        let verified = user
            .password
            .as_ref()
            .is_some_and(|stored| stored.matches(&current, self.services.hasher.as_ref()));
        if !verified {
            return Err(IdentityError::Unauthenticated);
        }

        let history = self
            .store
            .password_history(&user.user_id, self.services.policy.config().history_depth)
            .await?;

        self.services.policy.validate(&candidate, &history)?;

        let password = Password::create(candidate, self.services.hasher.as_ref())?;
        self.store
            .update_password_hash(&user.user_id, &password)
            .await?;

        tracing::info!(user_id = %user.user_id, "Password changed");
        Ok(())
    }
}
