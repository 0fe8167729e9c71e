//! Per-provider OAuth client settings

use std::fmt;

use platform::config::{ConfigError, env_opt, env_required};

use crate::domain::value_object::Provider;
use crate::error::{IdentityError, IdentityResult};

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// Client credentials plus the provider's public endpoints.
    pub fn with_defaults(
        provider: Provider,
        client_id: impl Into<String>,
        client_secret: Option<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        let (authorize_url, token_url, user_info_url, scopes): (&str, &str, &str, &[&str]) =
            match provider {
                Provider::Google => (
                    "https://accounts.google.com/o/oauth2/v2/auth",
                    "https://oauth2.googleapis.com/token",
                    "https://openidconnect.googleapis.com/v1/userinfo",
                    &["openid", "email", "profile"][..],
                ),
                Provider::Kakao => (
                    "https://kauth.kakao.com/oauth/authorize",
                    "https://kauth.kakao.com/oauth/token",
                    "https://kapi.kakao.com/v2/user/me",
                    &["account_email", "profile_nickname"][..],
                ),
                Provider::Naver => (
                    "https://nid.naver.com/oauth2.0/authorize",
                    "https://nid.naver.com/oauth2.0/token",
                    "https://openapi.naver.com/v1/nid/me",
                    &[][..],
                ),
            };

        Self {
            provider,
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            authorize_url: authorize_url.to_string(),
            token_url: token_url.to_string(),
            user_info_url: user_info_url.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Point all three endpoints at `base` (e.g. a mock server).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let name = self.provider.as_str();
        self.authorize_url = format!("{base}/{name}/authorize");
        self.token_url = format!("{base}/{name}/token");
        self.user_info_url = format!("{base}/{name}/userinfo");
        self
    }

    /// `{PROVIDER}_CLIENT_ID`, `_CLIENT_SECRET`, `_REDIRECT_URI`.
    ///
    /// `Ok(None)` when the client id is unset.
    pub fn from_env(provider: Provider) -> Result<Option<Self>, ConfigError> {
        let prefix = provider.as_str().to_ascii_uppercase();
        let Some(client_id) = env_opt(&format!("{prefix}_CLIENT_ID")) else {
            return Ok(None);
        };
        let client_secret = env_opt(&format!("{prefix}_CLIENT_SECRET"));
        let redirect_uri = env_required(&format!("{prefix}_REDIRECT_URI"))?;

        Ok(Some(Self::with_defaults(
            provider,
            client_id,
            client_secret,
            redirect_uri,
        )))
    }

    /// Credentials the authorization-code flow cannot run without.
    pub fn ensure_complete(&self) -> IdentityResult<()> {
        let missing = |what: &str| {
            IdentityError::Configuration(format!("{} provider has no {}", self.provider, what))
        };

        if self.client_id.trim().is_empty() {
            return Err(missing("client id"));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(missing("redirect uri"));
        }
        let has_secret = self
            .client_secret
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if self.provider.requires_client_secret() && !has_secret {
            return Err(missing("client secret"));
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uri", &self.redirect_uri)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("user_info_url", &self.user_info_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_complete() {
        let kakao = ProviderConfig::with_defaults(Provider::Kakao, "id", None, "https://app/cb");
        assert!(kakao.ensure_complete().is_ok());

        let google = ProviderConfig::with_defaults(Provider::Google, "id", None, "https://app/cb");
        assert!(matches!(
            google.ensure_complete(),
            Err(IdentityError::Configuration(_))
        ));

        let blank = ProviderConfig::with_defaults(Provider::Naver, " ", Some("s".into()), "https://app/cb");
        assert!(blank.ensure_complete().is_err());
    }

    #[test]
    fn test_with_base_url() {
        let config = ProviderConfig::with_defaults(Provider::Naver, "id", Some("s".into()), "https://app/cb")
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.token_url, "http://127.0.0.1:9000/naver/token");
        assert_eq!(config.user_info_url, "http://127.0.0.1:9000/naver/userinfo");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ProviderConfig::with_defaults(
            Provider::Google,
            "id",
            Some("very-secret".into()),
            "https://app/cb",
        );
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
