// ABOUTME: Config values that are either literals or environment variable references.
// ABOUTME: Used for the certificate identifier and the cloud region.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Reference to `var`, with an optional fallback.
    pub fn from_env(var: &str, default: Option<&str>) -> Self {
        EnvValue::FromEnv {
            var: var.to_string(),
            default: default.map(str::to_string),
        }
    }

    /// Resolve to a value. Empty environment variables count as unset.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) if !val.trim().is_empty() => Ok(val),
                _ => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}
