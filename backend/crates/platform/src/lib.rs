//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (randomness, SHA-256, Base64, constant-time compare)
//! - Password hashing (Argon2id) behind a swappable hasher trait
//! - Cookie and bearer header extraction
//! - Injectable clock
//! - Environment configuration helpers

pub mod bearer;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;
