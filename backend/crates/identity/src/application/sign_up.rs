//! Sign Up Use Case
//!
//! Creates a local account and signs it in.

use std::sync::Arc;

use kernel::id::UserId;
use platform::clock::Clock;
use platform::password::ClearTextPassword;

use crate::application::services::IdentityServices;
use crate::application::validation::RawFieldFailure;
use crate::domain::entity::user::User;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{BearerToken, Email, Nickname, Password};
use crate::error::{IdentityError, IdentityResult};

pub struct SignUpInput {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

pub struct SignUpOutput {
    pub user_id: UserId,
    pub token: BearerToken,
}

pub struct SignUpUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    services: Arc<IdentityServices>,
}

impl<S> SignUpUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, services: Arc<IdentityServices>) -> Self {
        Self { store, services }
    }

    pub async fn execute(&self, input: SignUpInput) -> IdentityResult<SignUpOutput> {
        let mut failures = Vec::new();

        let email = Email::new(&input.email)
            .map_err(|e| failures.push(RawFieldFailure::new("email", e.to_string(), e.code(), &input.email)))
            .ok();
        let nickname = Nickname::new(&input.nickname)
            .map_err(|e| {
                failures.push(RawFieldFailure::new("nickname", e.to_string(), e.code(), &input.nickname))
            })
            .ok();

        let password = ClearTextPassword::new(input.password);
        if let Err(violation) = self.services.policy.check_strength(&password) {
            let code = violation.code();
            failures.extend(
                violation
                    .messages()
                    .into_iter()
                    .map(|message| RawFieldFailure::without_value("password", message, code)),
            );
        }

        let summary = self.services.aggregator.process(failures, "sign_up");
        let (Some(email), Some(nickname)) = (email, nickname) else {
            return Err(IdentityError::Validation(summary));
        };
        if !summary.is_valid() {
            return Err(IdentityError::Validation(summary));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(IdentityError::EmailTaken);
        }
        if self.store.find_by_nickname(&nickname).await?.is_some() {
            return Err(IdentityError::NicknameTaken);
        }

        let password = Password::create(password, self.services.hasher.as_ref())?;
        let user = User::new_local(email, nickname, password, self.services.clock.now());
        self.store.create(&user).await?;

        let token = self.services.tokens.issue(&user.user_id.to_string())?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(SignUpOutput {
            user_id: user.user_id,
            token,
        })
    }
}

