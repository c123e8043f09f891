// ABOUTME: Generic retention run parameterized by its current state.
// ABOUTME: Holds the per-run settings alongside the state's data.

use super::policy::RetentionSettings;
use super::state::Initialized;
use crate::types::ImageName;

/// A retention run in progress.
///
/// `S` is one of the state types in `state`; the methods available on a run
/// depend on it, so steps cannot be skipped or repeated. A failed step
/// consumes the run and returns the error instead.
#[derive(Debug)]
pub struct RetentionRun<S> {
    pub(crate) settings: RetentionSettings,
    pub(crate) state: S,
}

impl RetentionRun<Initialized> {
    pub fn new(settings: RetentionSettings) -> Self {
        RetentionRun {
            settings,
            state: Initialized,
        }
    }
}

impl<S> RetentionRun<S> {
    pub fn settings(&self) -> &RetentionSettings {
        &self.settings
    }

    /// Name of the image family this run manages.
    pub fn filter(&self) -> &ImageName {
        &self.settings.filter
    }
}
