// ABOUTME: Uploads a scanned content tree into an origin bucket.
// ABOUTME: Bounded parallel uploads; the first failure fails the whole step.

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use snafu::ResultExt;

use super::content::{ContentFile, ContentRoot};
use super::error::{ContentSnafu, PublishError, ReadSnafu, UploadSnafu};
use super::mime::content_type_for;
use crate::provider::ObjectStore;
use crate::types::DomainName;

/// Upload parallelism used when none is configured.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// Totals for a completed publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub files: usize,
    pub bytes: u64,
}

/// Writes every file of a [`ContentRoot`] into an origin, overwriting
/// existing objects with the same key.
pub struct ContentPublisher<'a, P: ObjectStore> {
    store: &'a P,
    concurrency: usize,
}

impl<'a, P: ObjectStore> ContentPublisher<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self {
            store,
            concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    /// Maximum number of uploads in flight. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Publish all files. Stops at the first failed read or upload.
    pub async fn publish(
        &self,
        origin: &DomainName,
        content: &ContentRoot,
    ) -> Result<PublishSummary, PublishError> {
        let mut uploads = stream::iter(content.files())
            .map(|file| self.upload(origin, file))
            .buffer_unordered(self.concurrency);

        let mut summary = PublishSummary::default();
        while let Some(result) = uploads.next().await {
            summary.bytes += result?;
            summary.files += 1;
        }

        tracing::info!(
            origin = %origin,
            files = summary.files,
            bytes = summary.bytes,
            "content published"
        );
        Ok(summary)
    }

    async fn upload(&self, origin: &DomainName, file: &ContentFile) -> Result<u64, PublishError> {
        let body = tokio::fs::read(&file.path)
            .await
            .context(ReadSnafu { path: file.path.clone() })
            .context(ContentSnafu)?;
        let size = body.len() as u64;
        let content_type = content_type_for(&file.key);

        tracing::debug!(key = %file.key, content_type, size, "uploading object");
        self.store
            .put_object(origin, &file.key, Bytes::from(body), content_type)
            .await
            .context(UploadSnafu { key: file.key.clone() })?;
        Ok(size)
    }
}
