//! Social broker against mock provider endpoints

mod common;

use std::time::Duration;

use common::*;
use identity::application::SocialIdentityBroker;
use identity::domain::value_object::{Provider, ProviderAccessToken};
use identity::error::IdentityError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn broker_for(server: &MockServer) -> SocialIdentityBroker {
    let config = config_for(server);
    SocialIdentityBroker::new(config.providers, config.http_timeout).unwrap()
}

#[tokio::test]
async fn test_nested_provider_full_flow() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, Provider::Kakao, "kakao-code", "kakao-at").await;
    mount_user_info(&server, Provider::Kakao, "kakao-at", kakao_user("Jane@Example.com", "jane")).await;

    let identity = broker_for(&server)
        .authenticate(Provider::Kakao, "kakao-code")
        .await
        .unwrap();

    assert_eq!(identity.provider, Provider::Kakao);
    assert_eq!(identity.standard.email.as_str(), "jane@example.com");
    assert_eq!(identity.standard.nickname.as_str(), "jane");
    assert!(identity.raw.contains_key("kakao_account"));
}

#[tokio::test]
async fn test_flat_and_nested_shapes_standardize_identically() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, Provider::Google, "g-code", "g-at").await;
    mount_user_info(&server, Provider::Google, "g-at", google_user("jane@example.com", "jane")).await;
    mount_single_use_code(&server, Provider::Naver, "n-code", "n-at").await;
    mount_user_info(&server, Provider::Naver, "n-at", naver_user("jane@example.com", "jane")).await;

    let broker = broker_for(&server);
    let google = broker.authenticate(Provider::Google, "g-code").await.unwrap();
    let naver = broker.authenticate(Provider::Naver, "n-code").await.unwrap();

    assert_eq!(google.standard, naver.standard);
}

#[tokio::test]
async fn test_repeated_code_fails_and_propagates() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, Provider::Kakao, "once", "at-1").await;
    let broker = broker_for(&server);

    let first = broker.exchange_code_for_access_token(Provider::Kakao, "once").await;
    assert_eq!(first.unwrap().secret(), "at-1");

    let second = broker.exchange_code_for_access_token(Provider::Kakao, "once").await;
    assert!(matches!(
        second,
        Err(IdentityError::Exchange {
            provider: Provider::Kakao,
            ..
        })
    ));
}

#[tokio::test]
async fn test_error_body_with_success_status_is_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/naver/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "invalid_request",
            "error_description": "no valid data in session"
        })))
        .mount(&server)
        .await;

    let result = broker_for(&server)
        .exchange_code_for_access_token(Provider::Naver, "whatever")
        .await;
    assert!(matches!(result, Err(IdentityError::Exchange { .. })));
}

#[tokio::test]
async fn test_unparseable_token_response_is_exchange_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/google/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = broker_for(&server)
        .exchange_code_for_access_token(Provider::Google, "code")
        .await;
    assert!(matches!(result, Err(IdentityError::Exchange { .. })));
}

#[tokio::test]
async fn test_slow_token_endpoint_times_out_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kakao/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = broker_for(&server)
        .exchange_code_for_access_token(Provider::Kakao, "code")
        .await;
    assert!(matches!(result, Err(IdentityError::Exchange { .. })));
}

#[tokio::test]
async fn test_user_info_failures_are_fetch_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kakao/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/google/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
        .mount(&server)
        .await;

    let broker = broker_for(&server);
    let token = ProviderAccessToken::new("at");

    assert!(matches!(
        broker.fetch_raw_user_info(Provider::Kakao, &token).await,
        Err(IdentityError::Fetch { .. })
    ));
    assert!(matches!(
        broker.fetch_raw_user_info(Provider::Google, &token).await,
        Err(IdentityError::Fetch { .. })
    ));
}

#[tokio::test]
async fn test_contract_drift_is_standardization_error() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, Provider::Kakao, "code", "at").await;
    // Flat shape where the nested one is expected
    mount_user_info(
        &server,
        Provider::Kakao,
        "at",
        json!({ "email": "jane@example.com", "nickname": "jane" }),
    )
    .await;

    let err = broker_for(&server)
        .authenticate(Provider::Kakao, "code")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Standardization { .. }));
}

#[tokio::test]
async fn test_unconfigured_provider_is_configuration_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    let only_kakao = config
        .providers
        .into_iter()
        .filter(|p| p.provider == Provider::Kakao)
        .collect();
    let broker = SocialIdentityBroker::new(only_kakao, Duration::from_secs(1)).unwrap();

    assert!(matches!(
        broker.build_authorization_url(Provider::Google),
        Err(IdentityError::Configuration(_))
    ));
    assert!(matches!(
        broker.exchange_code_for_access_token(Provider::Naver, "code").await,
        Err(IdentityError::Configuration(_))
    ));
    // Nothing left the process
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_authorization_url_points_at_configured_endpoint() {
    let server = MockServer::start().await;
    let url = broker_for(&server)
        .build_authorization_url(Provider::Google)
        .unwrap();

    assert!(url.as_str().starts_with(&format!("{}/google/authorize?", server.uri())));
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("client_id".into(), "google-client".into())));
    assert!(pairs.contains(&("redirect_uri".into(), REDIRECT_URI.into())));
    assert!(pairs.contains(&("scope".into(), "openid email profile".into())));
}
