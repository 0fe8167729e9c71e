//! Error rendering
//!
//! RFC 7807 problem documents for [`AppError`], and the HTTP response
//! conversion when the `axum` feature is on.

use super::app_error::AppError;

/// RFC 7807 problem document for an [`AppError`].
///
/// Field errors are rendered as an `errors` object mapping each field name to
/// its list of messages, in first-seen field order.
pub fn problem_body(err: &AppError) -> serde_json::Value {
    let mut body = serde_json::json!({
        "type": format!("https://httpstatuses.io/{}", err.status_code()),
        "title": err.kind().as_str(),
        "status": err.status_code(),
        "detail": err.message(),
        "action": err.action(),
    });

    if !err.field_errors().is_empty() {
        let errors: serde_json::Map<String, serde_json::Value> = err
            .field_errors()
            .iter()
            .map(|f| (f.field.clone(), serde_json::json!(f.messages)))
            .collect();
        body["errors"] = serde_json::Value::Object(errors);
    }

    body
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(problem_body(&self))).into_response()
    }
}
