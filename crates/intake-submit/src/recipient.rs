//! Recipient email supplied by the hosting page.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameters that may carry the recipient email, in priority order.
pub const EMAIL_QUERY_KEYS: [&str; 3] = ["sendToEmail", "email", "userEmail"];

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error(
        "recipient email required: add an email query parameter (sendToEmail, email, or userEmail) to the page URL before submitting"
    )]
    Missing,

    #[error("invalid recipient email '{0}': expected local@domain.tld")]
    Invalid(String),

    #[error("invalid page URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// A validated `local@domain.tld` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientEmail(String);

impl RecipientEmail {
    pub fn parse(value: &str) -> Result<Self, EmailError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Missing);
        }
        if !EMAIL_REGEX.is_match(trimmed) {
            return Err(EmailError::Invalid(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Reads the first non-blank email parameter from a page URL.
    ///
    /// Parameter names match case-insensitively.
    pub fn from_page_url(url: &str) -> Result<Self, EmailError> {
        let parsed = Url::parse(url).map_err(|e| EmailError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let value = parsed
            .query_pairs()
            .filter(|(key, _)| {
                EMAIL_QUERY_KEYS
                    .iter()
                    .any(|candidate| key.eq_ignore_ascii_case(candidate))
            })
            .map(|(_, value)| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or(EmailError::Missing)?;
        Self::parse(&value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecipientEmail {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecipientEmail {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecipientEmail> for String {
    fn from(value: RecipientEmail) -> Self {
        value.0
    }
}
