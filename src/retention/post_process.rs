// ABOUTME: Post-build entry point: list, classify, execute, pass the artifact through.
// ABOUTME: Also provides a cancellable variant and a read-only planning pass.

use std::future::Future;

use super::RetentionRun;
use super::classifier::Classification;
use super::error::RetentionError;
use super::events::StatusSink;
use super::executor::ExecutionReport;
use super::policy::RetentionSettings;
use crate::catalog::ImageCatalog;

/// Result of a successful post-process step.
///
/// The artifact is returned exactly as received. It is never deleted or
/// replaced, whether or not it is one of the managed images.
#[derive(Debug)]
pub struct PostProcessOutcome<A> {
    pub artifact: A,
    /// Always `true`: the build's own artifact is kept.
    pub keep: bool,
    /// Always `false`: the caller's keep decision is not overridden.
    pub force_override: bool,
    pub report: ExecutionReport,
}

/// Enforce the retention policy, then hand `artifact` back.
///
/// # Errors
///
/// Any listing or mutation failure ends the run; the caller should halt the
/// wider pipeline.
pub async fn post_process<A, C, E>(
    settings: &RetentionSettings,
    artifact: A,
    catalog: &C,
    sink: &E,
) -> Result<PostProcessOutcome<A>, RetentionError>
where
    C: ImageCatalog + ?Sized,
    E: StatusSink + ?Sized,
{
    tracing::info!(
        identifier = %settings.filter,
        keep = settings.policy.keep,
        "enforcing image retention"
    );

    let run = RetentionRun::new(settings.clone()).list(catalog).await?;
    let run = run.classify();
    let run = run.execute(catalog, sink).await?;
    let report = run.finish();

    tracing::info!(
        updated = report.updated.len(),
        deleted = report.deleted.len(),
        "image retention complete"
    );

    Ok(PostProcessOutcome {
        artifact,
        keep: true,
        force_override: false,
        report,
    })
}

/// `post_process`, abandoned as soon as `shutdown` resolves.
///
/// An in-flight catalog call is dropped. Mutations that already completed
/// stay applied.
///
/// # Errors
///
/// Returns `RetentionError::Cancelled` when `shutdown` wins, otherwise the
/// same errors as `post_process`.
pub async fn post_process_until<A, C, E, F>(
    settings: &RetentionSettings,
    artifact: A,
    catalog: &C,
    sink: &E,
    shutdown: F,
) -> Result<PostProcessOutcome<A>, RetentionError>
where
    C: ImageCatalog + ?Sized,
    E: StatusSink + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = post_process(settings, artifact, catalog, sink) => result,
        () = shutdown => {
            tracing::warn!(identifier = %settings.filter, "retention run cancelled");
            Err(RetentionError::Cancelled {})
        }
    }
}

/// List and classify without mutating anything.
///
/// # Errors
///
/// Returns `RetentionError::Listing` if the listing fails.
pub async fn plan<C: ImageCatalog + ?Sized>(
    settings: &RetentionSettings,
    catalog: &C,
) -> Result<Classification, RetentionError> {
    let run = RetentionRun::new(settings.clone()).list(catalog).await?;
    Ok(run.classify().into_classification())
}
