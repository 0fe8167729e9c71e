//! Router behaviour through `tower::ServiceExt::oneshot`

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::*;
use identity::application::{IdentityConfig, TokenConfig};
use identity::{InMemoryUserStore, identity_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

fn app(config: IdentityConfig) -> Router {
    let (services, _clock) = services(config);
    identity_router(InMemoryUserStore::new(), services)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn sign_up(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "email": "jane@example.com", "nickname": "jane", "password": "Abcdef1!longpass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_sign_up_sets_cookie_and_returns_token() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "email": "jane@example.com", "nickname": "jane", "password": "Abcdef1!longpass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));

    let body = body_json(response).await;
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn test_validation_problem_masks_and_groups() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));

    let response = app
        .oneshot(json_request(
            "POST",
            "/signup",
            json!({ "email": "nope", "nickname": "j", "password": "hunter2hunter2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let fields: Vec<_> = body["errors"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(fields, ["email", "nickname", "password"]);
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));
    let token = sign_up(&app).await;

    let anonymous = app
        .clone()
        .oneshot(Request::get("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let bearer = app
        .clone()
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bearer.status(), StatusCode::OK);
    assert_eq!(body_json(bearer).await["nickname"], "jane");

    let cookie = app
        .clone()
        .oneshot(
            Request::get("/me")
                .header(header::COOKIE, format!("access_token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cookie.status(), StatusCode::OK);

    let tampered = app
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}x"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(tampered.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_in_failure_is_generic() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));
    sign_up(&app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/signin",
            json!({ "email": "jane@example.com", "password": "Wrong1!password" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["detail"], "Unauthenticated");
}

#[tokio::test]
async fn test_change_password_reuse_is_reported_on_password_field() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));
    let token = sign_up(&app).await;

    let request = Request::post("/password")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "currentPassword": "Abcdef1!longpass", "newPassword": "Abcdef1!longpass" })
                .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"]["password"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sign_out_clears_cookie() {
    let app = app(IdentityConfig::new(TokenConfig::new(vec![42u8; 32])));
    let response = app
        .oneshot(Request::post("/signout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_social_authorize_redirects_with_state() {
    let server = MockServer::start().await;
    let app = app(config_for(&server));

    let response = app
        .clone()
        .oneshot(Request::get("/social/kakao/authorize").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}/kakao/authorize?", server.uri())));
    assert!(location.contains("state="));
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("oauth_state="));

    let unknown = app
        .oneshot(Request::get("/social/myspace/authorize").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_social_callback_rejects_state_mismatch() {
    let server = MockServer::start().await;
    let app = app(config_for(&server));

    let response = app
        .oneshot(
            Request::get("/social/kakao/callback?code=abc&state=forged")
                .header(header::COOKIE, "oauth_state=expected")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // The code was never exchanged
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_social_callback_creates_account() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, identity::domain::value_object::Provider::Naver, "abc", "at").await;
    mount_user_info(
        &server,
        identity::domain::value_object::Provider::Naver,
        "at",
        naver_user("kim@example.com", "kim"),
    )
    .await;
    let app = app(config_for(&server));

    let response = app
        .oneshot(
            Request::get("/social/naver/callback?code=abc&state=s3cr3t-state")
                .header(header::COOKIE, "oauth_state=s3cr3t-state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("oauth_state=;")));
}

#[tokio::test]
async fn test_social_callback_requires_state_cookie_and_param() {
    let server = MockServer::start().await;
    mount_single_use_code(&server, identity::domain::value_object::Provider::Naver, "abc", "at").await;
    mount_user_info(
        &server,
        identity::domain::value_object::Provider::Naver,
        "at",
        naver_user("kim@example.com", "kim"),
    )
    .await;
    let app = app(config_for(&server));

    let requests = [
        // Victim never started the flow: no cookie at all
        Request::get("/social/naver/callback?code=abc").body(Body::empty()).unwrap(),
        Request::get("/social/naver/callback?code=abc&state=s3cr3t-state")
            .body(Body::empty())
            .unwrap(),
        // Cookie present but the provider redirect dropped `state`
        Request::get("/social/naver/callback?code=abc")
            .header(header::COOKIE, "oauth_state=s3cr3t-state")
            .body(Body::empty())
            .unwrap(),
        Request::get("/social/naver/callback?code=abc&state=")
            .header(header::COOKIE, "oauth_state=s3cr3t-state")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    // The code was never exchanged
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
