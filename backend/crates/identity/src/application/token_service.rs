//! Token Service
//!
//! Stateless HS256 JWTs. Validity is decided by signature, issuer and expiry
//! alone. Every way a token can be bad collapses into the same negative
//! answer.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use platform::bearer::extract_bearer;
use platform::clock::{Clock, SystemClock};
use platform::cookie::extract_cookie;

use crate::application::config::{MIN_SECRET_LEN, TokenConfig};
use crate::domain::value_object::{BearerToken, TokenClaims};
use crate::error::{IdentityError, IdentityResult};

#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Fails with `Configuration` when the secret is shorter than 32 bytes.
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> IdentityResult<Self> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(IdentityError::Configuration(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        // Expiry is checked against the injected clock in `verify`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["sub", "exp", "iss"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            config,
            clock,
        })
    }

    pub fn with_system_clock(config: TokenConfig) -> IdentityResult<Self> {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Sign a token for `subject` valid for the configured TTL.
    pub fn issue(&self, subject: &str) -> IdentityResult<BearerToken> {
        let iat = self.clock.now().timestamp();
        let ttl = i64::try_from(self.config.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Internal(format!("token encoding: {e}")))?;

        tracing::debug!(exp = claims.exp, "Token issued");

        Ok(BearerToken::new(token))
    }

    /// Signature, issuer and expiry check. No reason is given on failure.
    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_some()
    }

    /// Verified claims, or `Unauthenticated`.
    pub fn claims(&self, token: &str) -> IdentityResult<TokenClaims> {
        self.verify(token).ok_or(IdentityError::Unauthenticated)
    }

    /// Subject of a verified token, or `Unauthenticated`.
    pub fn subject(&self, token: &str) -> IdentityResult<String> {
        self.claims(token).map(|claims| claims.sub)
    }

    /// Bearer header first, then the token cookie.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<String> {
        extract_bearer(headers).or_else(|| extract_cookie(headers, &self.config.cookie_name))
    }

    fn verify(&self, token: &str) -> Option<TokenClaims> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| tracing::trace!(kind = ?e.kind(), "Token rejected"))
            .ok()?
            .claims;

        if self.clock.now().timestamp() > claims.exp {
            return None;
        }

        Some(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
