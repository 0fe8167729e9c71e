//! Nickname Value Object
//!
//! Public display handle. NFKC-normalized and trimmed; uniqueness is enforced
//! by the user store, not here.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const NICKNAME_MIN_LENGTH: usize = 2;
pub const NICKNAME_MAX_LENGTH: usize = 20;

const FALLBACK_NICKNAME: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("Nickname must be at least 2 characters")]
    TooShort,

    #[error("Nickname must be at most 20 characters")]
    TooLong,

    #[error("Nickname contains invalid characters")]
    InvalidCharacter,
}

impl NicknameError {
    pub fn code(&self) -> &'static str {
        match self {
            NicknameError::TooShort => "nickname.too_short",
            NicknameError::TooLong => "nickname.too_long",
            NicknameError::InvalidCharacter => "nickname.invalid_character",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NicknameError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let nickname = normalized.trim();

        if nickname.chars().any(char::is_control) {
            return Err(NicknameError::InvalidCharacter);
        }

        let len = nickname.chars().count();
        if len < NICKNAME_MIN_LENGTH {
            return Err(NicknameError::TooShort);
        }
        if len > NICKNAME_MAX_LENGTH {
            return Err(NicknameError::TooLong);
        }

        Ok(Self(nickname.to_string()))
    }

    /// Coerce a display name from an outside source into the nickname bounds.
    ///
    /// Control characters are dropped, long names are cut at the maximum and
    /// short ones padded with `_`. A name with nothing usable left becomes
    /// `user`. Never fails; uniqueness is still up to the caller.
    pub fn fit(raw: impl AsRef<str>) -> Self {
        let normalized: String = raw
            .as_ref()
            .nfkc()
            .filter(|c| !c.is_control())
            .collect();
        let mut nickname: String = normalized
            .trim()
            .chars()
            .take(NICKNAME_MAX_LENGTH)
            .collect::<String>()
            .trim_end()
            .to_string();

        if nickname.is_empty() {
            nickname.push_str(FALLBACK_NICKNAME);
        }
        while nickname.chars().count() < NICKNAME_MIN_LENGTH {
            nickname.push('_');
        }

        Self(nickname)
    }

    /// `base` + numeric suffix, shortening `base` so the result still fits.
    pub fn with_suffix(&self, suffix: u32) -> Self {
        let suffix = suffix.to_string();
        let keep = NICKNAME_MAX_LENGTH.saturating_sub(suffix.len());
        let base: String = self.0.chars().take(keep).collect();
        Self(format!("{}{}", base.trim_end(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_valid() {
        assert_eq!(Nickname::new("  alice ").unwrap().as_str(), "alice");
        assert!(Nickname::new("홍길동").is_ok());
    }

    #[test]
    fn test_nickname_invalid() {
        assert_eq!(Nickname::new("a").unwrap_err(), NicknameError::TooShort);
        assert_eq!(
            Nickname::new("x".repeat(NICKNAME_MAX_LENGTH + 1)).unwrap_err(),
            NicknameError::TooLong
        );
        assert_eq!(
            Nickname::new("bad\u{0007}name").unwrap_err(),
            NicknameError::InvalidCharacter
        );
    }

    #[test]
    fn test_fit_coerces_into_bounds() {
        let long = Nickname::fit("Christopher Alexander Smith");
        assert_eq!(long.as_str(), "Christopher Alexande");
        assert_eq!(long.as_str().chars().count(), NICKNAME_MAX_LENGTH);

        // Cut lands right after a space: trailing whitespace is dropped
        assert_eq!(
            Nickname::fit("abcdefghijklmnopqrs tuv").as_str(),
            "abcdefghijklmnopqrs"
        );

        assert_eq!(Nickname::fit("김").as_str(), "김_");
        assert_eq!(Nickname::fit("bad\u{0007}name").as_str(), "badname");
        assert_eq!(Nickname::fit("\u{0007}").as_str(), "user");
        assert_eq!(Nickname::fit("  jane ").as_str(), "jane");
    }

    #[test]
    fn test_fit_result_is_a_valid_nickname() {
        let inputs = ["김".to_string(), "x".repeat(40), "ab".to_string(), "\t\n".to_string()];
        for raw in &inputs {
            let fitted = Nickname::fit(raw);
            assert_eq!(Nickname::new(fitted.as_str()).unwrap(), fitted);
        }
    }

    #[test]
    fn test_with_suffix_stays_in_bounds() {
        let long = Nickname::new("y".repeat(NICKNAME_MAX_LENGTH)).unwrap();
        let suffixed = long.with_suffix(12);
        assert_eq!(suffixed.as_str().chars().count(), NICKNAME_MAX_LENGTH);
        assert!(suffixed.as_str().ends_with("12"));

        let short = Nickname::new("bob").unwrap();
        assert_eq!(short.with_suffix(2).as_str(), "bob2");
    }
}
