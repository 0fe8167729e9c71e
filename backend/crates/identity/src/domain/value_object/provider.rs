//! Identity Provider
//!
//! Closed set of federated providers. Each variant owns exactly one
//! transform from its raw user-info document to a [`StandardUser`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::email::Email;
use super::nickname::Nickname;
use super::provider_identity::StandardUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Flat claims: `{ email, name }`
    Google,
    /// Nested: `{ kakao_account: { email }, properties: { nickname } }`
    Kakao,
    /// Wrapped: `{ resultcode, response: { email, nickname } }`
    Naver,
}

/// Why a raw user-info document could not be standardized.
///
/// Carries the offending field path only, never its value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandardizationError {
    #[error("missing `{0}`")]
    Missing(&'static str),

    #[error("invalid `{0}`")]
    Invalid(&'static str),
}

impl StandardizationError {
    pub fn field(&self) -> &'static str {
        match self {
            StandardizationError::Missing(f) | StandardizationError::Invalid(f) => f,
        }
    }
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::Kakao, Provider::Naver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Kakao => "kakao",
            Provider::Naver => "naver",
        }
    }

    /// Whether the token endpoint insists on a client secret.
    pub fn requires_client_secret(&self) -> bool {
        match self {
            Provider::Google | Provider::Naver => true,
            Provider::Kakao => false,
        }
    }

    /// Map this provider's raw user info onto `{email, nickname}`.
    pub fn standardize(&self, raw: &Map<String, Value>) -> Result<StandardUser, StandardizationError> {
        let (email, nickname) = match self {
            Provider::Google => {
                if lookup_bool(raw, &["email_verified"]) == Some(false) {
                    return Err(StandardizationError::Invalid("email_verified"));
                }
                (
                    required(raw, &["email"], "email")?,
                    required(raw, &["name"], "name")?,
                )
            }
            Provider::Kakao => {
                if lookup_bool(raw, &["kakao_account", "is_email_verified"]) == Some(false) {
                    return Err(StandardizationError::Invalid("kakao_account.is_email_verified"));
                }
                (
                    required(raw, &["kakao_account", "email"], "kakao_account.email")?,
                    required(raw, &["properties", "nickname"], "properties.nickname")?,
                )
            }
            Provider::Naver => {
                if let Some(code) = lookup_str(raw, &["resultcode"]) {
                    if code != "00" {
                        return Err(StandardizationError::Invalid("resultcode"));
                    }
                }
                (
                    required(raw, &["response", "email"], "response.email")?,
                    required(raw, &["response", "nickname"], "response.nickname")?,
                )
            }
        };

        let email =
            Email::new(email).map_err(|_| StandardizationError::Invalid(self.email_field()))?;
        // Display names are free-form on the provider side
        let nickname = Nickname::fit(nickname);

        Ok(StandardUser { email, nickname })
    }

    fn email_field(&self) -> &'static str {
        match self {
            Provider::Google => "email",
            Provider::Kakao => "kakao_account.email",
            Provider::Naver => "response.email",
        }
    }
}

fn lookup<'a>(raw: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = raw;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)
}

fn lookup_str<'a>(raw: &'a Map<String, Value>, path: &[&str]) -> Option<&'a str> {
    lookup(raw, path)?.as_str()
}

fn lookup_bool(raw: &Map<String, Value>, path: &[&str]) -> Option<bool> {
    lookup(raw, path)?.as_bool()
}

fn required<'a>(
    raw: &'a Map<String, Value>,
    path: &[&str],
    label: &'static str,
) -> Result<&'a str, StandardizationError> {
    lookup_str(raw, path)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(StandardizationError::Missing(label))
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown identity provider")]
pub struct UnknownProvider;

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownProvider)
    }
}
