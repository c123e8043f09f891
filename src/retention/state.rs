// ABOUTME: Retention run state types for the type state pattern.
// ABOUTME: Each state carries the data produced by the step that reached it.

use super::classifier::Classification;
use super::executor::ExecutionReport;
use crate::catalog::ImageRecord;

/// Initial state: settings known, catalog not yet read.
/// Available actions: `list()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Listed: every matching image fetched.
/// Available actions: `classify()`
#[derive(Debug, Clone)]
pub struct Listed {
    pub(crate) images: Vec<ImageRecord>,
}

/// Classified: retain and purge sets decided.
/// Available actions: `execute()`
#[derive(Debug, Clone)]
pub struct Classified {
    pub(crate) classification: Classification,
}

/// Completed: every mutation succeeded.
/// Available actions: `finish()`
#[derive(Debug)]
pub struct Completed {
    pub(crate) report: ExecutionReport,
}
