// ABOUTME: Image catalog operations trait.
// ABOUTME: List one page of images, patch image metadata, delete an image.

use super::shared_types::{ImagePage, ListQuery, MetadataPatch, PageCursor};
use crate::types::ImageId;
use async_trait::async_trait;

/// A ready, authenticated handle on a remote image catalog.
///
/// Every call is a single request/response. Implementations own their
/// timeouts and any re-authentication; callers never retry.
#[async_trait]
pub trait ImageCatalog: Send + Sync {
    /// Fetch one page of images matching `query`.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next` afterwards.
    async fn list_page(
        &self,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ImagePage, CatalogError>;

    /// Apply a metadata patch to an image.
    ///
    /// Removing a property the image does not carry must succeed.
    async fn update_metadata(&self, id: &ImageId, patch: &MetadataPatch)
    -> Result<(), CatalogError>;

    /// Delete an image.
    async fn delete_image(&self, id: &ImageId) -> Result<(), CatalogError>;
}

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid client configuration: {0}")]
    Configuration(String),

    #[error("no {service} endpoint in service catalog: {detail}")]
    EndpointNotFound { service: String, detail: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("permission denied for {subject}: {message}")]
    Forbidden { subject: String, message: String },

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("catalog returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}
