// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates site and domain names while parsing.

use serde::Deserialize;

use crate::types::{DomainName, SiteName};

pub fn deserialize_site_name_option<'de, D>(deserializer: D) -> Result<Option<SiteName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| SiteName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_domain_name_option<'de, D>(
    deserializer: D,
) -> Result<Option<DomainName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| DomainName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}
