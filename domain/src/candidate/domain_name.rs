//! Domain name value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A normalised, syntactically valid domain name (Value Object)
///
/// Normalisation trims whitespace, surrounding quotes/backticks and a
/// trailing root dot, then lowercases. Two names that normalise to the
/// same string are the same candidate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Parse and normalise a raw name
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim()
            .trim_end_matches('.')
            .to_lowercase();

        if cleaned.is_empty() || cleaned.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(raw.to_string()));
        }

        let labels: Vec<&str> = cleaned.split('.').collect();
        if labels.len() < 2 {
            return Err(DomainError::InvalidDomainName(raw.to_string()));
        }

        for label in &labels {
            let valid = !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-');
            if !valid {
                return Err(DomainError::InvalidDomainName(raw.to_string()));
            }
        }

        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The top-level label, e.g. `com` for `acme.com`
    pub fn tld(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for DomainName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DomainName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DomainName::parse(&s).map_err(serde::de::Error::custom)
    }
}
