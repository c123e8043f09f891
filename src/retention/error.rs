// ABOUTME: Error type for a retention run, with SNAFU context selectors.
// ABOUTME: Separates authentication, listing, mutation, and cancellation failures.

use snafu::Snafu;

use super::executor::{ExecutionReport, MutationKind};
use crate::catalog::CatalogError;
use crate::types::ImageId;

/// Terminal failure of a retention run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RetentionError {
    /// No usable catalog client could be built.
    #[snafu(display("catalog authentication failed: {source}"))]
    Authentication { source: CatalogError },

    /// Listing failed; the catalog was not modified.
    #[snafu(display("failed to list images named {filter}: {source}"))]
    Listing {
        filter: String,
        source: CatalogError,
    },

    /// A patch or delete failed; earlier mutations stay applied.
    #[snafu(display("failed to {operation} image {name} ({id}): {source}"))]
    Mutation {
        operation: MutationKind,
        id: ImageId,
        name: String,
        source: CatalogError,
    },

    /// Continue-on-error execution finished with failures.
    #[snafu(display(
        "{} of {} image mutations failed",
        report.failed.len(),
        report.attempted()
    ))]
    Incomplete { report: ExecutionReport },

    /// The caller cancelled the run mid-flight.
    #[snafu(display("retention run cancelled"))]
    Cancelled {},
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionErrorKind {
    /// Could not authenticate against the catalog.
    Authentication,
    /// Listing or page decoding failed.
    Catalog,
    /// One or more mutations failed.
    Mutation,
    /// Run was cancelled.
    Cancelled,
}

impl RetentionError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RetentionErrorKind {
        match self {
            RetentionError::Authentication { .. } => RetentionErrorKind::Authentication,
            RetentionError::Listing { .. } => RetentionErrorKind::Catalog,
            RetentionError::Mutation { .. } | RetentionError::Incomplete { .. } => {
                RetentionErrorKind::Mutation
            }
            RetentionError::Cancelled { .. } => RetentionErrorKind::Cancelled,
        }
    }

    /// The image whose mutation stopped a fail-fast run.
    pub fn failed_image(&self) -> Option<&ImageId> {
        match self {
            RetentionError::Mutation { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The execution report of a continue-on-error run that had failures.
    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            RetentionError::Incomplete { report } => Some(report),
            _ => None,
        }
    }
}
