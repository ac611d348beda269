// ABOUTME: Site content handling: scanning the local tree and uploading it.
// ABOUTME: Content types are inferred from file extensions.

mod content;
mod error;
pub mod mime;
mod publisher;

pub use content::{ContentFile, ContentRoot, IGNORE_FILE};
pub use error::{ContentError, PublishError};
pub use publisher::{ContentPublisher, DEFAULT_UPLOAD_CONCURRENCY, PublishSummary};
