//! Shared fixtures for identity integration tests
//!
//! Provider endpoints are served by a wiremock server under
//! `/{provider}/authorize|token|userinfo`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use identity::application::{IdentityConfig, IdentityServices, ProviderConfig, TokenConfig};
use identity::domain::value_object::Provider;
use platform::clock::ManualClock;
use platform::password::testing::SaltedSha256Hasher;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REDIRECT_URI: &str = "https://app.test/api/auth/social/callback";
pub const START_TS: i64 = 1_700_000_000;

pub fn provider_config(server: &MockServer, provider: Provider) -> ProviderConfig {
    let secret = provider.requires_client_secret().then(|| format!("{provider}-secret"));
    ProviderConfig::with_defaults(provider, format!("{provider}-client"), secret, REDIRECT_URI)
        .with_base_url(&server.uri())
}

pub fn config_for(server: &MockServer) -> IdentityConfig {
    let mut config = IdentityConfig::new(TokenConfig::new(vec![42u8; 32]));
    config.http_timeout = Duration::from_millis(500);
    for provider in Provider::ALL {
        config = config.with_provider(provider_config(server, provider));
    }
    config
}

/// Services with a fast hasher and a pinned clock
pub fn services(config: IdentityConfig) -> (Arc<IdentityServices>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_timestamp(START_TS));
    let services =
        IdentityServices::with_parts(config, Arc::new(SaltedSha256Hasher), clock.clone()).unwrap();
    (Arc::new(services), clock)
}

pub fn kakao_user(email: &str, nickname: &str) -> Value {
    json!({
        "id": 1234567890,
        "connected_at": "2024-01-01T00:00:00Z",
        "properties": { "nickname": nickname },
        "kakao_account": {
            "has_email": true,
            "is_email_valid": true,
            "is_email_verified": true,
            "email": email
        }
    })
}

pub fn google_user(email: &str, name: &str) -> Value {
    json!({
        "sub": "109876543210",
        "email": email,
        "email_verified": true,
        "name": name,
        "picture": "https://example.test/p.png"
    })
}

pub fn naver_user(email: &str, nickname: &str) -> Value {
    json!({
        "resultcode": "00",
        "message": "success",
        "response": { "id": "abc", "email": email, "nickname": nickname }
    })
}

/// Token endpoint accepting `code` exactly once; any replay gets `invalid_grant`.
pub async fn mount_single_use_code(server: &MockServer, provider: Provider, code: &str, access_token: &str) {
    let token_path = format!("/{provider}/token");

    Mock::given(method("POST"))
        .and(path(token_path.clone()))
        .and(body_string_contains(format!("code={code}")))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(token_path))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "authorization code not found or already used"
        })))
        .with_priority(10)
        .mount(server)
        .await;
}

pub async fn mount_user_info(server: &MockServer, provider: Provider, access_token: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{provider}/userinfo")))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
