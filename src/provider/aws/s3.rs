// ABOUTME: ObjectStore implementation for S3 static website buckets.
// ABOUTME: Maps S3 error codes onto StoreError variants.

use async_trait::async_trait;
use aws_sdk_s3::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ErrorDocument, IndexDocument,
    ObjectIdentifier, PublicAccessBlockConfiguration, WebsiteConfiguration as S3Website,
};
use bytes::Bytes;

use super::{AwsProvider, describe, error_code, website_endpoint};
use crate::provider::traits::{AccessPolicy, ObjectStore, StoreError, WebsiteConfig};
use crate::types::DomainName;

/// Region where buckets are created without a location constraint.
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

fn map_store_error<E, R>(err: SdkError<E, R>, bucket: &str) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = format!("{}: {}", bucket, describe(&err));
    match error_code(&err) {
        Some("NoSuchBucket") => StoreError::NotFound(bucket.to_string()),
        Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => {
            StoreError::AlreadyExists(bucket.to_string())
        }
        Some("BucketNotEmpty") => StoreError::NotEmpty(bucket.to_string()),
        Some("AccessDenied")
        | Some("InvalidBucketName")
        | Some("InvalidArgument")
        | Some("MalformedPolicy")
        | Some("IllegalLocationConstraintException") => StoreError::Rejected(message),
        _ => StoreError::Provider(message),
    }
}

fn map_build_error(err: BuildError) -> StoreError {
    StoreError::Rejected(format!("invalid request: {}", err))
}

#[async_trait]
impl ObjectStore for AwsProvider {
    async fn list_origins(&self) -> Result<Vec<String>, StoreError> {
        let output = self
            .s3
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_store_error(e, "*"))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn create_origin(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut request = self.s3.create_bucket().bucket(name.as_str());

        // us-east-1 rejects an explicit location constraint
        if self.region != DEFAULT_BUCKET_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    async fn enable_website_hosting(
        &self,
        name: &DomainName,
        website: &WebsiteConfig,
    ) -> Result<(), StoreError> {
        let index = IndexDocument::builder()
            .suffix(&website.index_document)
            .build()
            .map_err(map_build_error)?;
        let error = ErrorDocument::builder()
            .key(&website.error_document)
            .build()
            .map_err(map_build_error)?;

        self.s3
            .put_bucket_website()
            .bucket(name.as_str())
            .website_configuration(
                S3Website::builder()
                    .index_document(index)
                    .error_document(error)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    async fn unblock_public_access(&self, name: &DomainName) -> Result<(), StoreError> {
        let configuration = PublicAccessBlockConfiguration::builder()
            .block_public_acls(false)
            .ignore_public_acls(false)
            .block_public_policy(false)
            .restrict_public_buckets(false)
            .build();

        self.s3
            .put_public_access_block()
            .bucket(name.as_str())
            .public_access_block_configuration(configuration)
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    async fn set_public_read_policy(
        &self,
        name: &DomainName,
        policy: &AccessPolicy,
    ) -> Result<(), StoreError> {
        let document = policy
            .to_json()
            .map_err(|e| StoreError::Rejected(format!("unserializable policy: {}", e)))?;

        self.s3
            .put_bucket_policy()
            .bucket(name.as_str())
            .policy(document)
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    async fn put_object(
        &self,
        name: &DomainName,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.s3
            .put_object()
            .bucket(name.as_str())
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    async fn delete_all_objects(&self, name: &DomainName) -> Result<(), StoreError> {
        let mut pages = self
            .s3
            .list_objects_v2()
            .bucket(name.as_str())
            .into_paginator()
            .send();

        let mut deleted = 0usize;
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| map_store_error(e, name.as_str()))?;

            let objects = page
                .contents()
                .iter()
                .filter_map(|object| object.key())
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_build_error)?;

            if objects.is_empty() {
                continue;
            }
            deleted += objects.len();

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(map_build_error)?;

            self.s3
                .delete_objects()
                .bucket(name.as_str())
                .delete(delete)
                .send()
                .await
                .map_err(|e| map_store_error(e, name.as_str()))?;
        }

        tracing::debug!(bucket = %name, deleted, "emptied bucket");
        Ok(())
    }

    async fn delete_origin(&self, name: &DomainName) -> Result<(), StoreError> {
        self.s3
            .delete_bucket()
            .bucket(name.as_str())
            .send()
            .await
            .map_err(|e| map_store_error(e, name.as_str()))?;
        Ok(())
    }

    fn website_endpoint(&self, name: &DomainName) -> String {
        website_endpoint(name.as_str(), &self.region)
    }
}
