// ABOUTME: Provider connection error types with SNAFU pattern.
// ABOUTME: Raised while building cloud clients, before any resource call is made.

use aws_credential_types::provider::error::CredentialsError;
use snafu::Snafu;

/// Failure to build a usable provider from the ambient environment.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConnectError {
    #[snafu(display("no cloud region configured (set AWS_REGION or `region` in edgesite.yml)"))]
    MissingRegion,

    #[snafu(display("no AWS credentials provider configured for region {region}"))]
    NoCredentialsProvider { region: String },

    #[snafu(display("no AWS credentials available for region {region}: {source}"))]
    MissingCredentials {
        region: String,
        source: CredentialsError,
    },
}
