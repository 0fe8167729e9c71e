//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the smallest core of vocabulary shared by every
//! backend crate:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed entity identifiers ([`id::Id`])
//!
//! Only things that are hard to change and mean the same thing in every
//! crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
