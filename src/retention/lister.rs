// ABOUTME: Collects every image matching a name across all catalog pages.
// ABOUTME: Follows page cursors until the catalog reports no further pages.

use std::collections::HashSet;

use crate::catalog::{CatalogError, ImageCatalog, ImageRecord, ListQuery, PageCursor};

/// List all images matching `query`.
///
/// Records are returned exactly as the catalog produced them, in page order.
/// No deduplication is done; an empty result is not an error.
///
/// # Errors
///
/// Returns the first `CatalogError` from any page, or `CatalogError::Decode`
/// when the catalog hands back a cursor that was already followed.
pub async fn list_images<C: ImageCatalog + ?Sized>(
    catalog: &C,
    query: &ListQuery,
) -> Result<Vec<ImageRecord>, CatalogError> {
    let mut images = Vec::new();
    let mut cursor: Option<PageCursor> = None;
    let mut seen = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = catalog.list_page(query, cursor.as_ref()).await?;
        pages += 1;
        images.extend(page.images);

        match page.next {
            Some(next) if !seen.insert(next.clone()) => {
                return Err(CatalogError::Decode(format!(
                    "pagination returned {} again after {pages} pages",
                    next.as_str()
                )));
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(
        name = %query.name,
        pages,
        images = images.len(),
        "listed images"
    );

    Ok(images)
}
