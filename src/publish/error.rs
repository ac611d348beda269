// ABOUTME: Error types for reading and uploading site content.
// ABOUTME: SNAFU context selectors attach the offending path or key.

use std::path::PathBuf;

use snafu::Snafu;

use crate::provider::StoreError;

/// Failure reading the local content tree.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ContentError {
    #[snafu(display("content root is not a directory: {}", path.display()))]
    NotADirectory { path: PathBuf },

    #[snafu(display("failed to walk {}: {source}", root.display()))]
    Walk {
        root: PathBuf,
        source: ignore::Error,
    },

    #[snafu(display("failed to stat {}: {source}", path.display()))]
    Metadata {
        path: PathBuf,
        source: ignore::Error,
    },

    #[snafu(display("file name is not valid UTF-8: {}", path.display()))]
    NonUtf8Path { path: PathBuf },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure publishing content into an origin.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PublishError {
    #[snafu(display("{source}"))]
    Content { source: ContentError },

    #[snafu(display("failed to upload {key}: {source}"))]
    Upload { key: String, source: StoreError },
}
