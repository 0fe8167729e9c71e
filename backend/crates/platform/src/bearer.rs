//! Bearer credential extraction from the `Authorization` header.

use axum::http::{HeaderMap, header};

const BEARER_SCHEME: &str = "bearer";

/// Extract the credential of an `Authorization: Bearer <credential>` header.
///
/// The scheme is matched case-insensitively (RFC 9110 §11.1). Other schemes,
/// a missing credential or a non-ASCII header value all yield `None`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then(|| credential.to_string())
}
