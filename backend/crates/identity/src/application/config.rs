//! Application Configuration
//!
//! Built once at startup and shared read-only through `Arc`.

use std::fmt;
use std::time::Duration;

use platform::config::{ConfigError, env_flag_or, env_opt, env_secret_b64, env_secs_or};
use platform::crypto::random_bytes;

pub use platform::cookie::SameSite;

use crate::application::social::provider_config::ProviderConfig;
use crate::domain::service::password_policy::PasswordPolicyConfig;
use crate::domain::value_object::Provider;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

// ============================================================================
// Token
// ============================================================================

#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 key, at least 32 bytes
    pub secret: Vec<u8>,
    pub ttl: Duration,
    /// Cookie consulted when no bearer header is present
    pub cookie_name: String,
    pub issuer: String,
}

impl TokenConfig {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            ttl: Duration::from_secs(3600),
            cookie_name: "access_token".to_string(),
            issuer: "identity".to_string(),
        }
    }

    pub fn with_random_secret() -> Self {
        Self::new(random_bytes(MIN_SECRET_LEN))
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .field("cookie_name", &self.cookie_name)
            .field("issuer", &self.issuer)
            .finish()
    }
}

// ============================================================================
// Masking
// ============================================================================

/// Field names whose rejected values never leave trusted code.
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "new_password",
    "current_password",
    "password_confirm",
    "password_confirmation",
    "old_password",
    "phone",
    "phone_number",
    "mobile",
    "token",
    "access_token",
    "refresh_token",
    "id_token",
    "secret",
    "client_secret",
    "code",
    "authorization",
    "cookie",
    "api_key",
    "otp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskingConfig {
    pub sensitive_fields: Vec<String>,
    /// Non-sensitive values longer than this are truncated
    pub max_value_length: usize,
    pub redaction_marker: String,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            sensitive_fields: DEFAULT_SENSITIVE_FIELDS.iter().map(|s| s.to_string()).collect(),
            max_value_length: 64,
            redaction_marker: "[REDACTED]".to_string(),
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

#[derive(Clone)]
pub struct IdentityConfig {
    pub token: TokenConfig,
    pub providers: Vec<ProviderConfig>,
    pub password: PasswordPolicyConfig,
    pub masking: MaskingConfig,
    /// Applied to every outbound provider call
    pub http_timeout: Duration,
    pub password_pepper: Option<Vec<u8>>,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl IdentityConfig {
    pub fn new(token: TokenConfig) -> Self {
        Self {
            token,
            providers: Vec::new(),
            password: PasswordPolicyConfig::default(),
            masking: MaskingConfig::default(),
            http_timeout: Duration::from_secs(10),
            password_pepper: None,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }

    /// Random secret, insecure cookie, no providers
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::new(TokenConfig::with_random_secret())
        }
    }

    /// Read configuration from the process environment.
    ///
    /// A provider is configured only when its `*_CLIENT_ID` is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env_secret_b64("IDENTITY_TOKEN_SECRET", MIN_SECRET_LEN)?
            .ok_or_else(|| ConfigError::Missing("IDENTITY_TOKEN_SECRET".to_string()))?;

        let mut token = TokenConfig::new(secret);
        token.ttl = env_secs_or("IDENTITY_TOKEN_TTL_SECS", token.ttl)?;
        if let Some(name) = env_opt("IDENTITY_TOKEN_COOKIE") {
            token.cookie_name = name;
        }
        if let Some(issuer) = env_opt("IDENTITY_TOKEN_ISSUER") {
            token.issuer = issuer;
        }

        let mut config = Self::new(token);
        config.http_timeout = env_secs_or("IDENTITY_HTTP_TIMEOUT_SECS", config.http_timeout)?;
        config.password_pepper = env_secret_b64("IDENTITY_PASSWORD_PEPPER", 16)?;
        config.cookie_secure = env_flag_or("IDENTITY_COOKIE_SECURE", true)?;
        if let Some(raw) = env_opt("IDENTITY_COOKIE_SAME_SITE") {
            config.cookie_same_site = SameSite::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                name: "IDENTITY_COOKIE_SAME_SITE".to_string(),
                reason: format!("expected Strict, Lax or None, got {raw:?}"),
            })?;
        }

        for provider in Provider::ALL {
            if let Some(provider_config) = ProviderConfig::from_env(provider)? {
                config.providers.push(provider_config);
            }
        }

        Ok(config)
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.providers.retain(|p| p.provider != provider.provider);
        self.providers.push(provider);
        self
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("token", &self.token)
            .field("providers", &self.providers)
            .field("password", &self.password)
            .field("masking", &self.masking)
            .field("http_timeout", &self.http_timeout)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = IdentityConfig::development();
        assert_eq!(config.token.secret.len(), MIN_SECRET_LEN);
        assert!(!config.cookie_secure);
        assert!(config.providers.is_empty());
        assert_eq!(config.password.history_depth, 5);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = IdentityConfig::new(TokenConfig::new(b"super-secret-signing-key-material!!".to_vec()));
        config.password_pepper = Some(b"pepper-bytes".to_vec());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("pepper-bytes"));
    }

    #[test]
    fn test_with_provider_replaces_existing() {
        let config = IdentityConfig::development()
            .with_provider(ProviderConfig::with_defaults(Provider::Kakao, "a", None, "https://app/cb"))
            .with_provider(ProviderConfig::with_defaults(Provider::Kakao, "b", None, "https://app/cb"));
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].client_id, "b");
    }

    #[test]
    fn test_sensitive_defaults() {
        let masking = MaskingConfig::default();
        assert!(masking.sensitive_fields.iter().any(|f| f == "password"));
        assert!(masking.sensitive_fields.iter().any(|f| f == "phone"));
        assert!(masking.sensitive_fields.iter().any(|f| f == "token"));
        assert!(!masking.sensitive_fields.iter().any(|f| f == "email"));
    }
}
