//! Password Policy
//!
//! Strength rules first, history rules only once the candidate is strong.
//! Hashing is injected through [`PasswordHasher`] so the history check can
//! run against a fast double.

use std::fmt;
use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicyConfig {
    /// Minimum length in Unicode code points
    pub min_length: usize,
    pub max_length: usize,
    /// Characters that satisfy the symbol requirement
    pub symbols: String,
    /// How many previous hashes a new password may not match
    pub history_depth: usize,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 128,
            symbols: DEFAULT_SYMBOLS.to_string(),
            history_depth: 5,
        }
    }
}

// ============================================================================
// Violations
// ============================================================================

/// One unmet strength rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthRequirement {
    Length { min: usize, max: usize },
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl fmt::Display for StrengthRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthRequirement::Length { min, max } => {
                write!(f, "Password must be between {} and {} characters", min, max)
            }
            StrengthRequirement::Lowercase => {
                f.write_str("Password must contain a lowercase letter")
            }
            StrengthRequirement::Uppercase => {
                f.write_str("Password must contain an uppercase letter")
            }
            StrengthRequirement::Digit => f.write_str("Password must contain a digit"),
            StrengthRequirement::Symbol => f.write_str("Password must contain a symbol"),
        }
    }
}

/// Why a candidate password was refused.
///
/// `Reused` never says which historical entry matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Password is too weak")]
    Weak { unmet: Vec<StrengthRequirement> },

    #[error("Password was used recently")]
    Reused,
}

impl PolicyViolation {
    /// Stable machine code
    pub fn code(&self) -> &'static str {
        match self {
            PolicyViolation::Weak { .. } => "password.weak",
            PolicyViolation::Reused => "password.reused",
        }
    }

    /// User-facing messages, one per unmet rule
    pub fn messages(&self) -> Vec<String> {
        match self {
            PolicyViolation::Weak { unmet } => unmet.iter().map(ToString::to_string).collect(),
            PolicyViolation::Reused => {
                vec!["Choose a password you have not used recently".to_string()]
            }
        }
    }
}

// ============================================================================
// Enforcer
// ============================================================================

#[derive(Clone)]
pub struct PasswordPolicyEnforcer {
    config: PasswordPolicyConfig,
    hasher: Arc<dyn PasswordHasher>,
}

impl PasswordPolicyEnforcer {
    pub fn new(config: PasswordPolicyConfig, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { config, hasher }
    }

    pub fn config(&self) -> &PasswordPolicyConfig {
        &self.config
    }

    /// Strength and history check.
    ///
    /// `prior` is ordered most recent first; only the first `history_depth`
    /// entries are consulted.
    pub fn validate(
        &self,
        candidate: &ClearTextPassword,
        prior: &[HashedPassword],
    ) -> Result<(), PolicyViolation> {
        self.check_strength(candidate)?;

        // Visit every entry so timing does not hint at the matching position
        let reused = prior
            .iter()
            .take(self.config.history_depth)
            .fold(false, |hit, hashed| self.hasher.verify(candidate, hashed) | hit);

        if reused {
            return Err(PolicyViolation::Reused);
        }
        Ok(())
    }

    /// Strength rules only. Reports every unmet rule at once.
    pub fn check_strength(&self, candidate: &ClearTextPassword) -> Result<(), PolicyViolation> {
        let len = candidate.char_count();
        let mut unmet = Vec::new();

        if len < self.config.min_length || len > self.config.max_length {
            unmet.push(StrengthRequirement::Length {
                min: self.config.min_length,
                max: self.config.max_length,
            });
        }

        let (mut lower, mut upper, mut digit, mut symbol) = (false, false, false, false);
        for c in candidate.chars() {
            lower |= c.is_lowercase();
            upper |= c.is_uppercase();
            digit |= c.is_ascii_digit();
            symbol |= self.config.symbols.contains(c);
        }

        if !lower {
            unmet.push(StrengthRequirement::Lowercase);
        }
        if !upper {
            unmet.push(StrengthRequirement::Uppercase);
        }
        if !digit {
            unmet.push(StrengthRequirement::Digit);
        }
        if !symbol {
            unmet.push(StrengthRequirement::Symbol);
        }

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(PolicyViolation::Weak { unmet })
        }
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }
}

impl fmt::Debug for PasswordPolicyEnforcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordPolicyEnforcer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
