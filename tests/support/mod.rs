// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup, site fixtures and request builders for integration tests.

use edgesite::deploy::{DeploySettings, DeploymentRequest};
use edgesite::provider::MemoryCloud;
use edgesite::provision::TeardownPolicy;
use edgesite::types::{DomainName, SiteName};
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

pub const CERTIFICATE: &str = "arn:aws:acm:us-east-1:123456789012:certificate/abc-123";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("edgesite=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A site with `index.html` and `css/site.css`.
#[allow(dead_code)]
pub fn site_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hello</h1>").unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), "body { margin: 0 }").unwrap();
    dir
}

#[allow(dead_code)]
pub fn request(site: &str, domain: &str, root: &Path) -> DeploymentRequest {
    DeploymentRequest::new(
        SiteName::new(site).unwrap(),
        DomainName::new(domain).unwrap(),
        root,
        CERTIFICATE,
        "us-east-1",
    )
}

/// The `myblog.example.com` request used across suites.
#[allow(dead_code)]
pub fn myblog(root: &Path) -> DeploymentRequest {
    request("myblog", "example.com", root)
}

/// A cloud with the `example.com.` zone registered.
#[allow(dead_code)]
pub fn cloud() -> MemoryCloud {
    let cloud = MemoryCloud::new();
    cloud.add_zone("example.com");
    cloud
}

#[allow(dead_code)]
pub fn fast_teardown() -> TeardownPolicy {
    TeardownPolicy {
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(4),
        max_wait: Duration::from_secs(2),
    }
}

#[allow(dead_code)]
pub fn fast_settings() -> DeploySettings {
    DeploySettings {
        teardown: fast_teardown(),
        ..DeploySettings::default()
    }
}
