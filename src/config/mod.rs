// ABOUTME: Configuration types and parsing for edgesite.yml.
// ABOUTME: Handles YAML parsing, env var references, .env loading and destination merging.

mod deserialize;
mod dotenv;
mod env_value;
mod init;
mod teardown;

pub use dotenv::{DOTENV_FILENAME, load_dotenv};
pub use env_value::EnvValue;
pub use init::init_config;
pub use teardown::TeardownConfig;

use crate::deploy::{DEFAULT_MAX_CONTENT_SIZE, DeploySettings};
use crate::error::{Error, Result};
use crate::provision::DEFAULT_INDEX_DOCUMENT;
use crate::publish::DEFAULT_UPLOAD_CONCURRENCY;
use crate::types::{DomainName, SiteName};
use deserialize::{deserialize_domain_name_option, deserialize_site_name_option};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "edgesite.yml";
pub const CONFIG_FILENAME_ALT: &str = "edgesite.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".edgesite/config.yml";

pub const CERTIFICATE_ENV: &str = "SSL_CERT_ARN";
pub const REGION_ENV: &str = "AWS_REGION";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_site_name_option")]
    pub site: Option<SiteName>,

    #[serde(default, deserialize_with = "deserialize_domain_name_option")]
    pub domain: Option<DomainName>,

    #[serde(default)]
    pub content: Option<PathBuf>,

    #[serde(default = "default_certificate")]
    pub certificate: EnvValue,

    #[serde(default = "default_region")]
    pub region: EnvValue,

    #[serde(default = "default_index_document")]
    pub index_document: String,

    #[serde(default = "default_max_content_size")]
    pub max_content_size: u64,

    #[serde(default = "default_upload_concurrency")]
    pub upload_concurrency: usize,

    #[serde(default)]
    pub teardown: TeardownConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_domain_name_option")]
    pub domain: Option<DomainName>,

    #[serde(default)]
    pub content: Option<PathBuf>,

    #[serde(default)]
    pub certificate: Option<EnvValue>,

    #[serde(default)]
    pub region: Option<EnvValue>,
}

fn default_certificate() -> EnvValue {
    EnvValue::from_env(CERTIFICATE_ENV, None)
}

fn default_region() -> EnvValue {
    EnvValue::from_env(REGION_ENV, Some(DEFAULT_REGION))
}

fn default_index_document() -> String {
    DEFAULT_INDEX_DOCUMENT.to_string()
}

fn default_max_content_size() -> u64 {
    DEFAULT_MAX_CONTENT_SIZE
}

fn default_upload_concurrency() -> usize {
    DEFAULT_UPLOAD_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site: None,
            domain: None,
            content: None,
            certificate: default_certificate(),
            region: default_region(),
            index_document: default_index_document(),
            max_content_size: default_max_content_size(),
            upload_concurrency: default_upload_concurrency(),
            teardown: TeardownConfig::default(),
            destinations: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], falling back to defaults when no file exists.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Apply the overrides of a named destination.
    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref domain) = dest.domain {
            merged.domain = Some(domain.clone());
        }

        if let Some(ref content) = dest.content {
            merged.content = Some(content.clone());
        }

        if let Some(ref certificate) = dest.certificate {
            merged.certificate = certificate.clone();
        }

        if let Some(ref region) = dest.region {
            merged.region = region.clone();
        }

        Ok(merged)
    }

    fn validate(&self) -> Result<()> {
        if self.index_document.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "index_document must not be empty".to_string(),
            ));
        }
        if self.max_content_size == 0 {
            return Err(Error::InvalidConfig(
                "max_content_size must be greater than zero".to_string(),
            ));
        }
        if self.upload_concurrency == 0 {
            return Err(Error::InvalidConfig(
                "upload_concurrency must be at least 1".to_string(),
            ));
        }
        if self.teardown.initial_interval.is_zero() || self.teardown.max_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "teardown intervals must be greater than zero".to_string(),
            ));
        }
        if self.teardown.initial_interval > self.teardown.max_interval {
            return Err(Error::InvalidConfig(
                "teardown.initial_interval must not exceed teardown.max_interval".to_string(),
            ));
        }
        Ok(())
    }

    /// Orchestrator settings derived from this config.
    pub fn settings(&self) -> DeploySettings {
        DeploySettings {
            index_document: self.index_document.clone(),
            max_content_size: self.max_content_size,
            upload_concurrency: self.upload_concurrency,
            teardown: self.teardown.policy(),
        }
    }

    pub fn template() -> Self {
        Config {
            site: SiteName::new("my-site").ok(),
            domain: DomainName::new("example.com").ok(),
            content: Some(PathBuf::from("public")),
            ..Config::default()
        }
    }
}
