//! Domain Services

pub mod password_policy;
