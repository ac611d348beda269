// ABOUTME: Validated DNS host names such as example.com or myblog.example.com.
// ABOUTME: Stored lowercase without a trailing dot; fqdn() adds the dot back.

use super::site_name::SiteName;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error)]
pub enum DomainNameError {
    #[error("domain name cannot be empty")]
    Empty,

    #[error("domain name exceeds maximum length of 253 characters")]
    TooLong,

    #[error("domain name contains an empty label")]
    EmptyLabel,

    #[error("domain label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("domain label cannot start or end with a hyphen: {0}")]
    HyphenAtEdge(String),

    #[error("invalid character in domain name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Parse a host name. A single trailing dot is accepted and dropped.
    pub fn new(value: &str) -> Result<Self, DomainNameError> {
        let value = value.trim();
        let value = value.strip_suffix('.').unwrap_or(value);
        if value.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if value.len() > MAX_NAME_LEN {
            return Err(DomainNameError::TooLong);
        }

        let lowered = value.to_ascii_lowercase();
        for label in lowered.split('.') {
            if label.is_empty() {
                return Err(DomainNameError::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainNameError::LabelTooLong(label.to_string()));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainNameError::HyphenAtEdge(label.to_string()));
            }
            if let Some(c) = label
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
            {
                return Err(DomainNameError::InvalidChar(c));
            }
        }

        Ok(Self(lowered))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified form with the trailing dot DNS APIs expect.
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }

    /// The host `<site>.<self>`.
    pub fn child(&self, site: &SiteName) -> Result<DomainName, DomainNameError> {
        DomainName::new(&format!("{}.{}", site, self.0))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for DomainName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
