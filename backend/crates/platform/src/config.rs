//! Environment Configuration Helpers
//!
//! Typed readers over process environment variables. `.env` loading is the
//! binary's job (`dotenvy`); these helpers only read what is already set.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::crypto::from_base64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Optional string variable; empty values count as unset.
pub fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Required string variable
pub fn env_required(name: &str) -> Result<String, ConfigError> {
    env_opt(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Parsed variable with a default when unset
pub fn env_parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Duration given in whole seconds, with a default when unset
pub fn env_secs_or(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    env_parse_or(name, default.as_secs()).map(Duration::from_secs)
}

/// Boolean flag: `1/true/yes/on` or `0/false/no/off`
pub fn env_flag_or(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env_opt(name) {
        None => Ok(default),
        Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("expected a boolean, got {raw:?}"),
        }),
    }
}

/// Standard base64 secret with a minimum decoded length
pub fn env_secret_b64(name: &str, min_len: usize) -> Result<Option<Vec<u8>>, ConfigError> {
    let Some(raw) = env_opt(name) else {
        return Ok(None);
    };
    let bytes = from_base64(raw.trim()).map_err(|e| ConfigError::Invalid {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    if bytes.len() < min_len {
        return Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("must decode to at least {min_len} bytes"),
        });
    }
    Ok(Some(bytes))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
