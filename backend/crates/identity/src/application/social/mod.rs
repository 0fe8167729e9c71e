//! Federated sign-in through OAuth2 authorization-code providers

pub mod broker;
pub mod provider_config;

pub use broker::{FlowStage, SocialIdentityBroker};
pub use provider_config::ProviderConfig;
