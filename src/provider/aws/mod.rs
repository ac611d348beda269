// ABOUTME: AWS provider built on the official SDK clients.
// ABOUTME: S3 website origins, CloudFront distributions and Route 53 alias records.

mod cloudfront;
mod route53;
mod s3;

use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use snafu::{OptionExt, ResultExt, ensure};

use super::error::{
    ConnectError, MissingCredentialsSnafu, MissingRegionSnafu, NoCredentialsProviderSnafu,
};
use super::traits::sealed::Sealed;

/// Regions whose S3 website endpoints use the legacy `s3-website-<region>` form.
const LEGACY_WEBSITE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Cloud provider backed by S3, CloudFront and Route 53.
///
/// CloudFront and Route 53 are global services; only bucket placement and the
/// website endpoint depend on `region`.
pub struct AwsProvider {
    s3: aws_sdk_s3::Client,
    cloudfront: aws_sdk_cloudfront::Client,
    route53: aws_sdk_route53::Client,
    region: String,
}

impl Sealed for AwsProvider {}

impl std::fmt::Debug for AwsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsProvider")
            .field("region", &self.region)
            .finish()
    }
}

impl AwsProvider {
    /// Build clients from an already loaded SDK configuration.
    pub fn from_config(config: &aws_config::SdkConfig, region: &str) -> Self {
        Self {
            s3: aws_sdk_s3::Client::new(config),
            cloudfront: aws_sdk_cloudfront::Client::new(config),
            route53: aws_sdk_route53::Client::new(config),
            region: region.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Load credentials from the default chain and build a provider for `region`.
///
/// # Errors
///
/// Returns `ConnectError` if the region is blank or the credential chain
/// yields no credentials. Nothing is provisioned before this succeeds.
pub async fn connect(region: &str) -> Result<AwsProvider, ConnectError> {
    let region = region.trim();
    ensure!(!region.is_empty(), MissingRegionSnafu);

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;

    resolve_credentials(sdk_config.credentials_provider(), region).await?;

    tracing::debug!(region, "AWS clients configured");
    Ok(AwsProvider::from_config(&sdk_config, region))
}

/// Ask the credential chain for credentials once, up front.
async fn resolve_credentials<P>(provider: Option<P>, region: &str) -> Result<(), ConnectError>
where
    P: ProvideCredentials,
{
    let provider = provider.context(NoCredentialsProviderSnafu { region })?;
    provider
        .provide_credentials()
        .await
        .context(MissingCredentialsSnafu { region })?;
    Ok(())
}

/// Public host name of an S3 static website bucket.
pub fn website_endpoint(bucket: &str, region: &str) -> String {
    if LEGACY_WEBSITE_REGIONS.contains(&region) {
        format!("{}.s3-website-{}.amazonaws.com", bucket, region)
    } else {
        format!("{}.s3-website.{}.amazonaws.com", bucket, region)
    }
}

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Service error code (e.g. `NoSuchBucket`) if the service returned one.
fn error_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.code()
}

/// Full error chain, including the service message.
fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    DisplayErrorContext(err).to_string()
}

/// Normalise SDK getters that return either `T` or `Option<T>`.
fn present<T>(value: impl Into<Option<T>>) -> Option<T> {
    value.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_region_uses_dash_endpoint() {
        assert_eq!(
            website_endpoint("myblog.example.com", "us-east-1"),
            "myblog.example.com.s3-website-us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn newer_region_uses_dot_endpoint() {
        assert_eq!(
            website_endpoint("myblog.example.com", "eu-central-1"),
            "myblog.example.com.s3-website.eu-central-1.amazonaws.com"
        );
    }

    #[derive(Debug)]
    struct Unavailable;

    impl ProvideCredentials for Unavailable {
        fn provide_credentials<'a>(
            &'a self,
        ) -> aws_credential_types::provider::future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            aws_credential_types::provider::future::ProvideCredentials::ready(Err(
                aws_credential_types::provider::error::CredentialsError::not_loaded(
                    "no profile or environment credentials",
                ),
            ))
        }
    }

    #[tokio::test]
    async fn failing_credential_chain_is_reported() {
        let err = resolve_credentials(Some(Unavailable), "us-east-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectError::MissingCredentials { ref region, .. } if region == "us-east-1"
        ));
    }

    #[tokio::test]
    async fn absent_credential_chain_is_reported() {
        let err = resolve_credentials(None::<Unavailable>, "eu-west-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectError::NoCredentialsProvider { ref region } if region == "eu-west-1"
        ));
    }

    #[tokio::test]
    async fn static_credentials_resolve() {
        let credentials =
            aws_credential_types::Credentials::new("AKIDEXAMPLE", "secret", None, None, "test");
        resolve_credentials(Some(credentials), "us-east-1")
            .await
            .unwrap();
    }

    #[test]
    fn present_accepts_plain_and_optional_values() {
        assert_eq!(present::<bool>(true), Some(true));
        assert_eq!(present::<&str>(None::<&str>), None);
    }
}
