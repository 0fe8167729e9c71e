//! Domain Layer
//!
//! Value objects, the user entity, the user-store port and the password
//! policy service.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use repository::{LocalUserStore, UserStore};
pub use service::password_policy::{
    PasswordPolicyConfig, PasswordPolicyEnforcer, PolicyViolation, StrengthRequirement,
};
