// ABOUTME: Opaque identifiers handed back by the CDN and DNS providers.
// ABOUTME: Each kind is its own newtype so a zone ID never stands in for a distribution ID.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! provider_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        #[must_use]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

provider_id!(
    /// CloudFront distribution ID, e.g. `E2QWRUHAPOMQZL`.
    DistributionId
);

provider_id!(
    /// Route 53 hosted zone ID without the `/hostedzone/` prefix.
    ZoneId
);

impl ZoneId {
    /// Route 53 reports `/hostedzone/Z123`; record APIs want `Z123`.
    pub fn from_provider(raw: &str) -> Self {
        let trimmed = raw.trim_end_matches('/');
        Self::new(trimmed.rsplit('/').next().unwrap_or(trimmed))
    }
}
