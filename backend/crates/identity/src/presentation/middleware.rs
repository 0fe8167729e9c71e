//! Identity Middleware
//!
//! Bearer authentication for protected routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;

use crate::application::IdentityServices;

/// Verified caller, inserted into request extensions by [`require_bearer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    pub user_id: UserId,
}

/// Reject the request with a bare 401 unless it carries a valid token
/// (bearer header, then cookie).
pub async fn require_bearer(
    State(services): State<Arc<IdentityServices>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let subject = services
        .tokens
        .resolve(req.headers())
        .and_then(|token| services.tokens.subject(&token).ok())
        .and_then(|sub| sub.parse::<UserId>().ok());

    let Some(user_id) = subject else {
        return Err((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
        )
            .into_response());
    };

    req.extensions_mut().insert(AuthenticatedSubject { user_id });
    Ok(next.run(req).await)
}
