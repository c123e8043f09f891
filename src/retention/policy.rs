// ABOUTME: Retention policy and per-run settings.
// ABOUTME: How many images to keep, how ties are ordered, and what a failed mutation does.

use crate::types::ImageName;
use serde::Deserialize;

/// Ordering among images whose creation timestamps are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the order the catalog listed them in. Not a total order: two
    /// listings of the same images may tie-break differently.
    #[default]
    InputOrder,
    /// Ascending image ID among equal timestamps.
    Id,
}

/// What the executor does when a patch or delete fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure; nothing already applied is undone.
    #[default]
    FailFast,
    /// Attempt every image and report all failures at the end.
    Continue,
}

/// Keep the `keep` most recent images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    pub keep: usize,
    pub tie_break: TieBreak,
}

impl RetentionPolicy {
    pub fn keep(keep: usize) -> Self {
        Self {
            keep,
            tie_break: TieBreak::default(),
        }
    }

    /// Build from a signed count; anything below one keeps nothing.
    pub fn from_signed(keep: i64) -> Self {
        if keep < 0 {
            Self::keep(0)
        } else {
            Self::keep(usize::try_from(keep).unwrap_or(usize::MAX))
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// Everything one retention run needs besides the catalog handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionSettings {
    /// Name shared by the image family.
    pub filter: ImageName,
    pub policy: RetentionPolicy,
    pub on_error: FailurePolicy,
    /// Listing page size; the catalog default applies when `None`.
    pub page_size: Option<u32>,
}

impl RetentionSettings {
    pub fn new(filter: ImageName, policy: RetentionPolicy) -> Self {
        Self {
            filter,
            policy,
            on_error: FailurePolicy::default(),
            page_size: None,
        }
    }

    pub fn with_failure_policy(mut self, on_error: FailurePolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }
}
