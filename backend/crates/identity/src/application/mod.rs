//! Application Layer
//!
//! Token service, social broker, validation aggregation and the use cases
//! built on them.

pub mod change_password;
pub mod config;
pub mod current_user;
pub mod services;
pub mod sign_in;
pub mod sign_up;
pub mod social;
pub mod social_sign_in;
pub mod token_service;
pub mod validation;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::{IdentityConfig, MaskingConfig, TokenConfig};
pub use current_user::{CurrentUserUseCase, UserProfile};
pub use services::IdentityServices;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use social::{FlowStage, ProviderConfig, SocialIdentityBroker};
pub use social_sign_in::{SocialSignInInput, SocialSignInOutput, SocialSignInUseCase};
pub use token_service::TokenService;
pub use validation::{
    MaskingPolicy, RawFieldFailure, ValidationAggregator, ValidationFailure, ValidationSummary,
};
