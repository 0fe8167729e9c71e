//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text on drop
//! - Optional application-wide pepper
//!
//! Hashing sits behind the [`PasswordHasher`] trait so that policy code can
//! be exercised with a fast double that keeps the one-way contract.

use std::fmt;

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Unicode is NFKC-normalized on construction so that visually identical
/// inputs hash identically.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        let mut raw = raw.into();
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    /// Number of Unicode code points (not bytes)
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Character view for policy checks. Never log what comes out of here.
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.0.chars()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// One-way encoded password.
///
/// For the Argon2id hasher this is a PHC string (algorithm, version,
/// parameters, salt and hash).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap an encoded hash produced by some [`PasswordHasher`].
    pub fn from_encoded(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Create from a PHC string (e.g. from storage), validating its shape.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Encoded form for storage
    pub fn as_encoded(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher abstraction
// ============================================================================

/// One-way password hashing.
///
/// `verify` must only succeed for the clear text that produced the hash.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError>;

    fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool;
}

/// Argon2id with OWASP default parameters (m=19456, t=2, p=1).
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    pepper: Option<Vec<u8>>,
}

impl Argon2PasswordHasher {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }
}

impl fmt::Debug for Argon2PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let mut bytes = password.peppered(self.pepper.as_deref());
        let salt = SaltString::generate(OsRng);

        let result = Argon2::default()
            .hash_password(&bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        bytes.zeroize();
        result
    }

    fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };

        let mut bytes = password.peppered(self.pepper.as_deref());
        // Argon2 compares in constant time internally
        let ok = Argon2::default().verify_password(&bytes, &parsed).is_ok();
        bytes.zeroize();
        ok
    }
}

// ============================================================================
// Test double
// ============================================================================

/// Fast salted SHA-256 hasher for tests. Not for production use.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;
    use crate::crypto::{constant_time_eq, from_base64url, random_bytes, sha256, to_base64url};

    /// Encodes as `sha256$<salt>$<digest>`; verification recomputes the digest.
    #[derive(Debug, Clone, Default)]
    pub struct SaltedSha256Hasher;

    impl SaltedSha256Hasher {
        fn digest(salt: &[u8], password: &ClearTextPassword) -> [u8; 32] {
            let mut input = salt.to_vec();
            input.extend_from_slice(password.0.as_bytes());
            sha256(&input)
        }
    }

    impl PasswordHasher for SaltedSha256Hasher {
        fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
            let salt = random_bytes(16);
            let digest = Self::digest(&salt, password);
            Ok(HashedPassword::from_encoded(format!(
                "sha256${}${}",
                to_base64url(&salt),
                to_base64url(&digest)
            )))
        }

        fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
            let mut parts = hashed.as_encoded().split('$');
            let (Some("sha256"), Some(salt), Some(digest), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return false;
            };
            let (Ok(salt), Ok(digest)) = (from_base64url(salt), from_base64url(digest)) else {
                return false;
            };
            constant_time_eq(&Self::digest(&salt, password), &digest)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
