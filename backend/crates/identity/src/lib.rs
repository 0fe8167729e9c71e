//! Identity (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects, user entity, user-store port, password policy
//! - `application/` - Token service, social broker, validation aggregation, use cases
//! - `infra/` - User store adapters
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Stateless HS256 bearer tokens (header or cookie)
//! - OAuth2 authorization-code sign-in with Google, Kakao and Naver
//! - Password strength and reuse policy
//! - Per-field validation summaries with sensitive values masked
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Token checks fail closed with no reason given
//! - Authorization codes are exchanged once and never retried

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use application::{IdentityServices, SocialIdentityBroker, TokenService, ValidationAggregator};
pub use domain::{PasswordPolicyEnforcer, UserStore};
pub use error::{IdentityError, IdentityResult};
pub use infra::memory::InMemoryUserStore;
pub use presentation::router::identity_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
