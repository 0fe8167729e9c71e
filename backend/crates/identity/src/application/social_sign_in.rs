//! Social Sign In Use Case
//!
//! Completes a provider callback: the broker resolves the code to a
//! standardized identity, which is matched to an account by email or
//! becomes a new one.

use std::sync::Arc;

use kernel::id::UserId;
use platform::clock::Clock;

use crate::application::services::IdentityServices;
use crate::domain::entity::user::User;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{BearerToken, Nickname, Provider};
use crate::error::{IdentityError, IdentityResult};

/// Numeric suffixes tried before giving up on a free nickname
const MAX_NICKNAME_ATTEMPTS: u32 = 100;

pub struct SocialSignInInput {
    pub provider: Provider,
    pub code: String,
}

pub struct SocialSignInOutput {
    pub user_id: UserId,
    pub token: BearerToken,
    /// Whether this sign-in created the account
    pub created: bool,
}

pub struct SocialSignInUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    services: Arc<IdentityServices>,
}

impl<S> SocialSignInUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, services: Arc<IdentityServices>) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: SocialSignInInput) -> IdentityResult<SocialSignInOutput> {
        let identity = self
            .services
            .broker
            .authenticate(input.provider, &input.code)
            .await?;
        let standard = identity.standard;

        let (user, created) = match self.store.find_by_email(&standard.email).await? {
            Some(user) => (user, false),
            None => {
                let nickname = self.free_nickname(&standard.nickname).await?;
                let user = User::new_social(
                    standard.email,
                    nickname,
                    input.provider,
                    self.services.clock.now(),
                );
                self.store.create(&user).await?;
                (user, true)
            }
        };

        let token = self.services.tokens.issue(&user.user_id.to_string())?;

        tracing::info!(
            user_id = %user.user_id,
            provider = %input.provider,
            created,
            "User signed in with provider"
        );

        Ok(SocialSignInOutput {
            user_id: user.user_id,
            token,
            created,
        })
    }

    /// `base`, then `base1`, `base2`, ... until one is unused.
    async fn free_nickname(&self, base: &Nickname) -> IdentityResult<Nickname> {
        if self.store.find_by_nickname(base).await?.is_none() {
            return Ok(base.clone());
        }
        for suffix in 1..MAX_NICKNAME_ATTEMPTS {
            let candidate = base.with_suffix(suffix);
            if self.store.find_by_nickname(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(IdentityError::NicknameTaken)
    }
}
