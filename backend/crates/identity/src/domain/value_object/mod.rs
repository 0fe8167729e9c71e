//! Value Object Module

pub mod bearer_token;
pub mod email;
pub mod nickname;
pub mod password;
pub mod provider;
pub mod provider_identity;

pub use bearer_token::{BearerToken, TokenClaims};
pub use email::{Email, EmailError};
pub use nickname::{Nickname, NicknameError};
pub use password::Password;
pub use provider::{Provider, StandardizationError, UnknownProvider};
pub use provider_identity::{ProviderAccessToken, ProviderIdentity, StandardUser};
