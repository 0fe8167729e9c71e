//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldErrors},
    kind::ErrorKind,
};
use platform::config::ConfigError;
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::application::validation::ValidationSummary;
use crate::domain::service::password_policy::PolicyViolation;
use crate::domain::value_object::{Provider, provider::StandardizationError};

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Missing or invalid setup (signing secret, provider credentials)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider token endpoint refused the code or answered garbage
    #[error("Token exchange with {provider} failed: {reason}")]
    Exchange { provider: Provider, reason: String },

    /// Provider user-info endpoint failed
    #[error("User info fetch from {provider} failed: {reason}")]
    Fetch { provider: Provider, reason: String },

    /// Provider user-info no longer matches the expected shape
    #[error("User info from {provider} could not be standardized: {source}")]
    Standardization {
        provider: Provider,
        #[source]
        source: StandardizationError,
    },

    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),

    #[error("Validation failed")]
    Validation(ValidationSummary),

    /// Generic authentication failure; never says which check failed
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Provider segment in the URL is not one we know
    #[error("Unknown identity provider")]
    UnknownProvider,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Nickname already in use")]
    NicknameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::Configuration(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
            IdentityError::Exchange { .. }
            | IdentityError::Fetch { .. }
            | IdentityError::Standardization { .. } => ErrorKind::BadGateway,
            IdentityError::PolicyViolation(_) | IdentityError::Validation(_) => {
                ErrorKind::UnprocessableEntity
            }
            IdentityError::Unauthenticated => ErrorKind::Unauthorized,
            IdentityError::EmailTaken | IdentityError::NicknameTaken => ErrorKind::Conflict,
            IdentityError::UnknownProvider | IdentityError::UserNotFound => ErrorKind::NotFound,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError.
    ///
    /// Server-side faults get a generic message; their detail stays in logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            IdentityError::Configuration(_) | IdentityError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            IdentityError::Exchange { .. } | IdentityError::Fetch { .. } => {
                AppError::bad_gateway("Identity provider request failed")
                    .with_action("Please try signing in again")
            }
            IdentityError::Standardization { .. } => {
                AppError::bad_gateway("Identity provider returned an unexpected profile")
            }
            IdentityError::PolicyViolation(violation) => AppError::unprocessable(violation.to_string())
                .with_field_errors(vec![FieldErrors {
                    field: "password".to_string(),
                    messages: violation.messages(),
                }]),
            IdentityError::Validation(summary) => {
                AppError::unprocessable("Validation failed")
                    .with_action("Fix the highlighted fields")
                    .with_field_errors(summary.to_field_errors())
            }
            IdentityError::Unauthenticated => AppError::unauthorized("Unauthenticated"),
            IdentityError::EmailTaken | IdentityError::NicknameTaken => {
                AppError::conflict(self.to_string())
            }
            IdentityError::UnknownProvider | IdentityError::UserNotFound => {
                AppError::new(self.kind(), self.to_string())
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Configuration(msg) => {
                tracing::error!(message = %msg, "Identity configuration error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::Standardization { provider, source } => {
                tracing::error!(
                    provider = %provider,
                    field = source.field(),
                    "Provider user info contract drift"
                );
            }
            IdentityError::Exchange { provider, reason } => {
                tracing::warn!(provider = %provider, reason = %reason, "Code exchange failed");
            }
            IdentityError::Fetch { provider, reason } => {
                tracing::warn!(provider = %provider, reason = %reason, "User info fetch failed");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ConfigError> for IdentityError {
    fn from(err: ConfigError) -> Self {
        IdentityError::Configuration(err.to_string())
    }
}

impl From<PasswordHashError> for IdentityError {
    fn from(err: PasswordHashError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::validation::{MaskingPolicy, RawFieldFailure, ValidationAggregator};

    #[test]
    fn test_status_codes() {
        assert_eq!(IdentityError::Unauthenticated.status_code(), 401);
        assert_eq!(IdentityError::EmailTaken.status_code(), 409);
        assert_eq!(IdentityError::Configuration("x".into()).status_code(), 500);
        assert_eq!(IdentityError::UnknownProvider.status_code(), 404);
        assert_eq!(
            IdentityError::Exchange {
                provider: Provider::Google,
                reason: "400".into()
            }
            .status_code(),
            502
        );
        assert_eq!(IdentityError::PolicyViolation(PolicyViolation::Reused).status_code(), 422);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let app = IdentityError::Configuration("secret too short".into()).to_app_error();
        assert!(!app.message().contains("secret"));
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let summary = ValidationAggregator::new(MaskingPolicy::default()).process(
            vec![
                RawFieldFailure::new("email", "Email is invalid", "email.invalid", "nope"),
                RawFieldFailure::new("password", "Password is too weak", "password.weak", "x"),
            ],
            "test",
        );
        let app = IdentityError::Validation(summary).to_app_error();
        let fields: Vec<_> = app.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["email", "password"]);
    }
}
