// ABOUTME: State transition methods for a retention run.
// ABOUTME: Each method consumes the run and returns the next state on success.

use snafu::ResultExt;

use super::RetentionRun;
use super::classifier::{Classification, classify};
use super::error::{ListingSnafu, RetentionError};
use super::events::StatusSink;
use super::executor::{ExecutionReport, execute};
use super::lister::list_images;
use super::state::{Classified, Completed, Initialized, Listed};
use crate::catalog::{ImageCatalog, ImageRecord, ListQuery};

impl<S> RetentionRun<S> {
    fn transition<T>(self, state: T) -> RetentionRun<T> {
        RetentionRun {
            settings: self.settings,
            state,
        }
    }
}

// =============================================================================
// Initialized -> Listed
// =============================================================================

impl RetentionRun<Initialized> {
    /// Fetch every image named like the filter.
    ///
    /// # Errors
    ///
    /// Returns `RetentionError::Listing` if any page fails; the catalog is
    /// untouched in that case.
    pub async fn list<C: ImageCatalog + ?Sized>(
        self,
        catalog: &C,
    ) -> Result<RetentionRun<Listed>, RetentionError> {
        let query = ListQuery::by_name(&self.settings.filter).with_limit(self.settings.page_size);
        let images = list_images(catalog, &query).await.context(ListingSnafu {
            filter: self.settings.filter.to_string(),
        })?;

        tracing::debug!(images = images.len(), "listing complete");
        Ok(self.transition(Listed { images }))
    }
}

// =============================================================================
// Listed -> Classified
// =============================================================================

impl RetentionRun<Listed> {
    /// Images returned by the listing, in catalog order.
    pub fn images(&self) -> &[ImageRecord] {
        &self.state.images
    }

    /// Decide which images to keep. Pure; cannot fail.
    #[must_use = "run state must be used"]
    pub fn classify(self) -> RetentionRun<Classified> {
        let policy = self.settings.policy;
        let classification = classify(self.state.images, &policy);

        tracing::debug!(
            keep = policy.keep,
            retain = classification.retain.len(),
            purge = classification.purge.len(),
            "classified images"
        );

        RetentionRun {
            settings: self.settings,
            state: Classified { classification },
        }
    }
}

// =============================================================================
// Classified -> Completed
// =============================================================================

impl RetentionRun<Classified> {
    pub fn classification(&self) -> &Classification {
        &self.state.classification
    }

    /// Stop here without touching the catalog.
    pub fn into_classification(self) -> Classification {
        self.state.classification
    }

    /// Patch retained images and delete purged ones.
    ///
    /// # Errors
    ///
    /// Returns `RetentionError::Mutation` on the first failure when failing
    /// fast, or `RetentionError::Incomplete` with the full report when
    /// continuing on error and anything failed.
    pub async fn execute<C, E>(
        self,
        catalog: &C,
        sink: &E,
    ) -> Result<RetentionRun<Completed>, RetentionError>
    where
        C: ImageCatalog + ?Sized,
        E: StatusSink + ?Sized,
    {
        let report = execute(
            catalog,
            &self.state.classification,
            self.settings.on_error,
            sink,
        )
        .await?;

        if !report.all_succeeded() {
            return Err(RetentionError::Incomplete { report });
        }

        Ok(self.transition(Completed { report }))
    }
}

// =============================================================================
// Completed
// =============================================================================

impl RetentionRun<Completed> {
    pub fn report(&self) -> &ExecutionReport {
        &self.state.report
    }

    /// Consume the run, returning its report.
    pub fn finish(self) -> ExecutionReport {
        self.state.report
    }
}
