//! Identity component wiring
//!
//! Built once from an [`IdentityConfig`] and shared by every use case.

use std::sync::Arc;

use platform::clock::{Clock, SystemClock};
use platform::crypto::{random_bytes, to_base64url};
use platform::password::{Argon2PasswordHasher, ClearTextPassword, PasswordHasher};

use crate::application::config::IdentityConfig;
use crate::application::social::SocialIdentityBroker;
use crate::application::token_service::TokenService;
use crate::application::validation::{MaskingPolicy, ValidationAggregator};
use crate::domain::service::password_policy::PasswordPolicyEnforcer;
use crate::domain::value_object::Password;
use crate::error::IdentityResult;

pub struct IdentityServices {
    pub config: Arc<IdentityConfig>,
    pub tokens: TokenService,
    pub broker: SocialIdentityBroker,
    pub policy: PasswordPolicyEnforcer,
    pub aggregator: ValidationAggregator,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
    /// Hash of an unguessable secret. Sign-in verifies against it when there
    /// is no stored password, so every path costs one hash verification.
    pub decoy_password: Password,
}

impl IdentityServices {
    /// Argon2id hashing and the wall clock
    pub fn new(config: IdentityConfig) -> IdentityResult<Self> {
        let hasher = Arc::new(Argon2PasswordHasher::new(config.password_pepper.clone()));
        Self::with_parts(config, hasher, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: IdentityConfig,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> IdentityResult<Self> {
        let tokens = TokenService::new(config.token.clone(), clock.clone())?;
        let broker = SocialIdentityBroker::new(config.providers.clone(), config.http_timeout)?;
        let policy = PasswordPolicyEnforcer::new(config.password.clone(), hasher.clone());
        let aggregator = ValidationAggregator::new(MaskingPolicy::new(&config.masking));
        let decoy_password = Password::create(
            ClearTextPassword::new(to_base64url(&random_bytes(32))),
            hasher.as_ref(),
        )?;

        tracing::info!(
            providers = ?config.providers.iter().map(|p| p.provider.as_str()).collect::<Vec<_>>(),
            token_ttl_secs = config.token.ttl.as_secs(),
            "Identity services ready"
        );

        Ok(Self {
            config: Arc::new(config),
            tokens,
            broker,
            policy,
            aggregator,
            hasher,
            clock,
            decoy_password,
        })
    }
}
