//! Sign In Use Case
//!
//! Every failure is the same `Unauthenticated`: unknown email, social-only
//! account and wrong password are indistinguishable to the caller, in the
//! answer and in the time taken (one hash verification on every path).

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::services::IdentityServices;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{BearerToken, Email};
use crate::error::{IdentityError, IdentityResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub struct SignInOutput {
    pub user_id: UserId,
    pub token: BearerToken,
}

pub struct SignInUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    services: Arc<IdentityServices>,
}

impl<S> SignInUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, services: Arc<IdentityServices>) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: SignInInput) -> IdentityResult<SignInOutput> {
        let password = ClearTextPassword::new(input.password);
        let user = match Email::new(&input.email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let stored = user.as_ref().and_then(|u| u.password.as_ref());
        let has_password = stored.is_some();
        let matched = stored
            .unwrap_or(&self.services.decoy_password)
            .matches(&password, self.services.hasher.as_ref());

        let user = match user {
            Some(user) if matched && has_password => user,
            user => {
                tracing::debug!(user_id = ?user.map(|u| u.user_id), "Sign-in rejected");
                return Err(IdentityError::Unauthenticated);
            }
        };

        let token = self.services.tokens.issue(&user.user_id.to_string())?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput {
            user_id: user.user_id,
            token,
        })
    }
}
