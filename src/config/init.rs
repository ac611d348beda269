// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates edgesite.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{DomainName, SiteName};

use super::{CERTIFICATE_ENV, CONFIG_FILENAME, Config, DEFAULT_REGION, REGION_ENV};

pub fn init_config(
    dir: &Path,
    site: Option<&str>,
    domain: Option<&str>,
    content: Option<&str>,
    force: bool,
) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(s) = site {
        config.site = Some(SiteName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?);
    }

    if let Some(d) = domain {
        config.domain = Some(DomainName::new(d).map_err(|e| Error::InvalidConfig(e.to_string()))?);
    }

    if let Some(c) = content {
        config.content = Some(PathBuf::from(c));
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(config_path)
}

fn generate_template_yaml(config: &Config) -> String {
    let site = config
        .site
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_default();
    let domain = config
        .domain
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_default();
    let content = config
        .content
        .as_ref()
        .map(|c| c.display().to_string())
        .unwrap_or_default();

    format!(
        r#"site: {site}
domain: {domain}
content: {content}
certificate:
  env: {CERTIFICATE_ENV}
region:
  env: {REGION_ENV}
  default: {DEFAULT_REGION}
# index_document: index.html
# max_content_size: 52428800
# upload_concurrency: 8
# teardown:
#   initial_interval: 5s
#   max_interval: 60s
#   max_wait: 20m
# destinations:
#   staging:
#     domain: staging.example.com
"#
    )
}
