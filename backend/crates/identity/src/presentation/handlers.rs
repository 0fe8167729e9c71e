//! HTTP Handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use platform::cookie::{CookieConfig, extract_cookie};
use platform::crypto::{constant_time_eq, random_bytes, to_base64url};

use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, CurrentUserUseCase, IdentityServices, SignInInput,
    SignInUseCase, SignUpInput, SignUpUseCase, SocialSignInInput, SocialSignInUseCase,
};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{BearerToken, Provider};
use crate::error::{IdentityError, IdentityResult};
use crate::presentation::dto::{
    ChangePasswordRequest, ProfileResponse, SignInRequest, SignUpRequest, SocialCallbackQuery,
    TokenResponse,
};
use crate::presentation::middleware::AuthenticatedSubject;

/// Cookie binding an authorization redirect to the browser that started it
const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_MAX_AGE_SECS: u64 = 600;

/// Shared state for identity handlers
#[derive(Clone)]
pub struct IdentityAppState<S>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub services: Arc<IdentityServices>,
}

// ============================================================================
// Helpers
// ============================================================================

fn token_cookie(services: &IdentityServices) -> CookieConfig {
    CookieConfig {
        name: services.tokens.cookie_name().to_string(),
        secure: services.config.cookie_secure,
        same_site: services.config.cookie_same_site,
        max_age_secs: Some(services.tokens.ttl().as_secs()),
        ..CookieConfig::default()
    }
}

fn state_cookie(services: &IdentityServices) -> CookieConfig {
    CookieConfig {
        name: STATE_COOKIE.to_string(),
        secure: services.config.cookie_secure,
        same_site: services.config.cookie_same_site,
        max_age_secs: Some(STATE_COOKIE_MAX_AGE_SECS),
        ..CookieConfig::default()
    }
}

fn token_response(
    services: &IdentityServices,
    status: StatusCode,
    user_id: String,
    token: BearerToken,
) -> Response {
    let cookie = token_cookie(services).build_set_cookie(token.as_str());
    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse {
            user_id,
            access_token: token.into_string(),
            token_type: "Bearer".to_string(),
            expires_in: services.tokens.ttl().as_secs(),
        }),
    )
        .into_response()
}

fn parse_provider(raw: &str) -> IdentityResult<Provider> {
    raw.parse().map_err(|_| IdentityError::UnknownProvider)
}

// ============================================================================
// Sign Up / Sign In / Sign Out
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<S>(
    State(state): State<IdentityAppState<S>>,
    Json(req): Json<SignUpRequest>,
) -> IdentityResult<impl IntoResponse>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.store.clone(), state.services.clone());

    let output = use_case
        .execute(SignUpInput {
            email: req.email,
            nickname: req.nickname,
            password: req.password,
        })
        .await?;

    Ok(token_response(
        &state.services,
        StatusCode::CREATED,
        output.user_id.to_string(),
        output.token,
    ))
}

/// POST /api/auth/signin
pub async fn sign_in<S>(
    State(state): State<IdentityAppState<S>>,
    Json(req): Json<SignInRequest>,
) -> IdentityResult<impl IntoResponse>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.store.clone(), state.services.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(token_response(
        &state.services,
        StatusCode::OK,
        output.user_id.to_string(),
        output.token,
    ))
}

/// POST /api/auth/signout
///
/// Tokens are stateless; this only clears the cookie.
pub async fn sign_out<S>(State(state): State<IdentityAppState<S>>) -> impl IntoResponse
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let cookie = token_cookie(&state.services).build_delete_cookie();
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Authenticated
// ============================================================================

/// GET /api/auth/me
pub async fn me<S>(
    State(state): State<IdentityAppState<S>>,
    Extension(subject): Extension<AuthenticatedSubject>,
) -> IdentityResult<Json<ProfileResponse>>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let use_case = CurrentUserUseCase::new(state.store.clone(), state.services.clone());
    let profile = use_case.load(&subject.user_id).await?;
    Ok(Json(profile.into()))
}

/// POST /api/auth/password
pub async fn change_password<S>(
    State(state): State<IdentityAppState<S>>,
    Extension(subject): Extension<AuthenticatedSubject>,
    Json(req): Json<ChangePasswordRequest>,
) -> IdentityResult<StatusCode>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.store.clone(), state.services.clone());

    use_case
        .execute(ChangePasswordInput {
            user_id: subject.user_id,
            current_password: req.current_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Social
// ============================================================================

/// GET /api/auth/social/{provider}/authorize
///
/// Redirects to the provider with a fresh `state`, remembered in a cookie.
pub async fn social_authorize<S>(
    State(state): State<IdentityAppState<S>>,
    Path(provider): Path<String>,
) -> IdentityResult<impl IntoResponse>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let provider = parse_provider(&provider)?;
    let csrf_state = to_base64url(&random_bytes(16));

    let url = state
        .services
        .broker
        .build_authorization_url_with_state(provider, &csrf_state)?;

    let cookie = state_cookie(&state.services).build_set_cookie(&csrf_state);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(url.as_str()),
    ))
}

/// GET /api/auth/social/{provider}/callback?code=...
pub async fn social_callback<S>(
    State(state): State<IdentityAppState<S>>,
    Path(provider): Path<String>,
    Query(query): Query<SocialCallbackQuery>,
    headers: HeaderMap,
) -> IdentityResult<impl IntoResponse>
where
    S: UserStore + Clone + Send + Sync + 'static,
{
    let provider = parse_provider(&provider)?;

    if let Some(error) = query.error {
        tracing::debug!(provider = %provider, error = %error, "Provider reported an error");
        return Err(IdentityError::Unauthenticated);
    }

    // Only the browser that went through `social_authorize` may finish the flow
    let expected = extract_cookie(&headers, STATE_COOKIE);
    let returned = query.state.as_deref().filter(|s| !s.is_empty());
    match (expected, returned) {
        (Some(expected), Some(returned))
            if constant_time_eq(expected.as_bytes(), returned.as_bytes()) => {}
        (expected, returned) => {
            tracing::warn!(
                provider = %provider,
                has_cookie = expected.is_some(),
                has_state = returned.is_some(),
                "OAuth state missing or mismatched"
            );
            return Err(IdentityError::Unauthenticated);
        }
    }

    let code = query.code.ok_or(IdentityError::Unauthenticated)?;

    let use_case = SocialSignInUseCase::new(state.store.clone(), state.services.clone());
    let output = use_case.execute(SocialSignInInput { provider, code }).await?;

    let status = if output.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let clear_state = state_cookie(&state.services).build_delete_cookie();

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_state)]),
        token_response(&state.services, status, output.user_id.to_string(), output.token),
    ))
}
