//! Social Identity Broker
//!
//! Drives the authorization-code flow for each configured provider:
//!
//! ```text
//! START → AUTH_URL_ISSUED → CODE_RECEIVED → TOKEN_EXCHANGED → USER_FETCHED → STANDARDIZED
//! ```
//!
//! Outbound calls are never retried. Authorization codes are single-use, so a
//! failed exchange is surfaced to the caller as is.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::application::social::provider_config::ProviderConfig;
use crate::domain::value_object::{Provider, ProviderAccessToken, ProviderIdentity, StandardUser};
use crate::error::{IdentityError, IdentityResult};

/// Stages of one provider sign-in, emitted at `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    AuthUrlIssued,
    CodeReceived,
    TokenExchanged,
    UserFetched,
    Standardized,
}

impl FlowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStage::AuthUrlIssued => "AUTH_URL_ISSUED",
            FlowStage::CodeReceived => "CODE_RECEIVED",
            FlowStage::TokenExchanged => "TOKEN_EXCHANGED",
            FlowStage::UserFetched => "USER_FETCHED",
            FlowStage::Standardized => "STANDARDIZED",
        }
    }
}

fn enter(provider: Provider, stage: FlowStage) {
    tracing::debug!(provider = %provider, stage = stage.as_str(), "Social sign-in stage");
}

/// Token endpoint body. Some providers answer 200 with an `error` member.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

pub struct SocialIdentityBroker {
    providers: HashMap<Provider, ProviderConfig>,
    http: reqwest::Client,
}

impl SocialIdentityBroker {
    /// `timeout` bounds every outbound call; hitting it is an exchange or
    /// fetch failure.
    pub fn new(providers: Vec<ProviderConfig>, timeout: Duration) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Configuration(format!("http client: {e}")))?;

        Ok(Self::with_client(providers, http))
    }

    pub fn with_client(providers: Vec<ProviderConfig>, http: reqwest::Client) -> Self {
        let providers = providers.into_iter().map(|p| (p.provider, p)).collect();
        Self { providers, http }
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.config(provider).is_ok()
    }

    fn config(&self, provider: Provider) -> IdentityResult<&ProviderConfig> {
        let config = self.providers.get(&provider).ok_or_else(|| {
            IdentityError::Configuration(format!("{provider} provider is not configured"))
        })?;
        config.ensure_complete()?;
        Ok(config)
    }

    // ========================================================================
    // Authorization URL
    // ========================================================================

    /// Deterministic for a given provider configuration.
    pub fn build_authorization_url(&self, provider: Provider) -> IdentityResult<Url> {
        let url = self.authorization_url(provider, None)?;
        enter(provider, FlowStage::AuthUrlIssued);
        Ok(url)
    }

    /// Same URL with an opaque `state` value appended for CSRF binding.
    pub fn build_authorization_url_with_state(
        &self,
        provider: Provider,
        state: &str,
    ) -> IdentityResult<Url> {
        let url = self.authorization_url(provider, Some(state))?;
        enter(provider, FlowStage::AuthUrlIssued);
        Ok(url)
    }

    fn authorization_url(&self, provider: Provider, state: Option<&str>) -> IdentityResult<Url> {
        let config = self.config(provider)?;
        let mut url = Url::parse(&config.authorize_url).map_err(|e| {
            IdentityError::Configuration(format!("{provider} authorize url: {e}"))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &config.client_id)
                .append_pair("redirect_uri", &config.redirect_uri);
            if !config.scopes.is_empty() {
                query.append_pair("scope", &config.scopes.join(" "));
            }
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }

        Ok(url)
    }

    // ========================================================================
    // Outbound calls
    // ========================================================================

    /// One POST to the token endpoint.
    pub async fn exchange_code_for_access_token(
        &self,
        provider: Provider,
        code: &str,
    ) -> IdentityResult<ProviderAccessToken> {
        let config = self.config(provider)?;
        enter(provider, FlowStage::CodeReceived);

        let exchange_error = |reason: String| IdentityError::Exchange { provider, reason };

        if code.trim().is_empty() {
            return Err(exchange_error("empty authorization code".to_string()));
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];
        if let Some(secret) = config.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .http
            .post(&config.token_url)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| exchange_error(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(exchange_error(format!("token endpoint returned {status}")));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|_| exchange_error("unparseable token response".to_string()))?;

        if let Some(error) = body.error {
            return Err(exchange_error(format!("token endpoint error `{error}`")));
        }

        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| exchange_error("token response has no access_token".to_string()))?;

        enter(provider, FlowStage::TokenExchanged);
        Ok(ProviderAccessToken::new(token))
    }

    /// One GET to the user-info endpoint. The body must be a JSON object.
    pub async fn fetch_raw_user_info(
        &self,
        provider: Provider,
        access_token: &ProviderAccessToken,
    ) -> IdentityResult<Map<String, Value>> {
        let config = self.config(provider)?;
        let fetch_error = |reason: String| IdentityError::Fetch { provider, reason };

        let response = self
            .http
            .get(&config.user_info_url)
            .header(ACCEPT, "application/json")
            .bearer_auth(access_token.secret())
            .send()
            .await
            .map_err(|e| fetch_error(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("user info endpoint returned {status}")));
        }

        let raw = match response.json::<Value>().await {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(fetch_error("user info is not a JSON object".to_string())),
            Err(_) => return Err(fetch_error("unparseable user info".to_string())),
        };

        enter(provider, FlowStage::UserFetched);
        Ok(raw)
    }

    // ========================================================================
    // Standardization
    // ========================================================================

    pub fn extract_standard_user(
        &self,
        provider: Provider,
        raw: &Map<String, Value>,
    ) -> IdentityResult<StandardUser> {
        let user = provider
            .standardize(raw)
            .map_err(|source| IdentityError::Standardization { provider, source })?;
        enter(provider, FlowStage::Standardized);
        Ok(user)
    }

    /// Exchange, fetch and standardize in one go.
    pub async fn authenticate(
        &self,
        provider: Provider,
        code: &str,
    ) -> IdentityResult<ProviderIdentity> {
        let access_token = self.exchange_code_for_access_token(provider, code).await?;
        let raw = self.fetch_raw_user_info(provider, &access_token).await?;
        let standard = self.extract_standard_user(provider, &raw)?;

        Ok(ProviderIdentity {
            provider,
            raw,
            standard,
        })
    }
}

impl std::fmt::Debug for SocialIdentityBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialIdentityBroker")
            .field("providers", &self.providers.values().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Failure category only; reqwest errors can echo the request URL.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        "request failed".to_string()
    }
}
