// ABOUTME: Applies a classification to the catalog one image at a time.
// ABOUTME: Clears the verification flag on retained images and deletes purged ones.

use super::classifier::Classification;
use super::error::RetentionError;
use super::events::{StatusEvent, StatusSink};
use super::policy::FailurePolicy;
use crate::catalog::{CatalogError, ImageCatalog, ImageRecord, MetadataPatch};
use crate::types::ImageId;
use std::fmt;

/// The catalog mutation attempted on one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    UpdateMetadata,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::UpdateMetadata => write!(f, "update metadata for"),
            MutationKind::Delete => write!(f, "delete"),
        }
    }
}

/// A mutation that failed under `FailurePolicy::Continue`.
#[derive(Debug)]
pub struct MutationFailure {
    pub kind: MutationKind,
    pub id: ImageId,
    pub name: String,
    pub error: CatalogError,
}

/// Per-image outcome of an execution.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Retained images whose verification flag was cleared.
    pub updated: Vec<ImageId>,
    /// Purged images that were deleted.
    pub deleted: Vec<ImageId>,
    /// Mutations that failed (only populated when continuing on error).
    pub failed: Vec<MutationFailure>,
}

impl ExecutionReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of mutations issued.
    pub fn attempted(&self) -> usize {
        self.updated.len() + self.deleted.len() + self.failed.len()
    }
}

/// Patch every retained image, then delete every purged image, in
/// classification order.
///
/// A status event is emitted before each catalog call. Calls are issued one
/// at a time; nothing is rolled back.
///
/// # Errors
///
/// Under `FailurePolicy::FailFast`, returns `RetentionError::Mutation` for the
/// first failed call and issues no further calls. Under
/// `FailurePolicy::Continue` this never fails; failures land in the report.
pub async fn execute<C, E>(
    catalog: &C,
    classification: &Classification,
    on_error: FailurePolicy,
    sink: &E,
) -> Result<ExecutionReport, RetentionError>
where
    C: ImageCatalog + ?Sized,
    E: StatusSink + ?Sized,
{
    let patch = MetadataPatch::clear_verification();
    let mut report = ExecutionReport::default();

    let steps = classification
        .retain
        .iter()
        .map(|record| (MutationKind::UpdateMetadata, record))
        .chain(
            classification
                .purge
                .iter()
                .map(|record| (MutationKind::Delete, record)),
        );

    for (kind, record) in steps {
        match apply(catalog, kind, record, &patch, sink).await {
            Ok(()) => match kind {
                MutationKind::UpdateMetadata => report.updated.push(record.id.clone()),
                MutationKind::Delete => report.deleted.push(record.id.clone()),
            },
            Err(error) => match on_error {
                FailurePolicy::FailFast => {
                    return Err(RetentionError::Mutation {
                        operation: kind,
                        id: record.id.clone(),
                        name: record.name.clone(),
                        source: error,
                    });
                }
                FailurePolicy::Continue => {
                    tracing::warn!(
                        image = %record.id,
                        name = %record.name,
                        "failed to {kind} image: {error}"
                    );
                    report.failed.push(MutationFailure {
                        kind,
                        id: record.id.clone(),
                        name: record.name.clone(),
                        error,
                    });
                }
            },
        }
    }

    Ok(report)
}

async fn apply<C, E>(
    catalog: &C,
    kind: MutationKind,
    record: &ImageRecord,
    patch: &MetadataPatch,
    sink: &E,
) -> Result<(), CatalogError>
where
    C: ImageCatalog + ?Sized,
    E: StatusSink + ?Sized,
{
    let event = match kind {
        MutationKind::UpdateMetadata => StatusEvent::updating_metadata(record),
        MutationKind::Delete => StatusEvent::deleting(record),
    };
    sink.emit(&event);
    tracing::info!(image = %record.id, created_at = %record.created_at, "{event}");

    match kind {
        MutationKind::UpdateMetadata => catalog.update_metadata(&record.id, patch).await,
        MutationKind::Delete => catalog.delete_image(&record.id).await,
    }
}
