// ABOUTME: Splits listed images into those to keep and those to delete.
// ABOUTME: Newest first by creation time; the first K are retained.

use super::policy::{RetentionPolicy, TieBreak};
use crate::catalog::ImageRecord;

/// Retain and purge sets of one run, each newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub retain: Vec<ImageRecord>,
    pub purge: Vec<ImageRecord>,
}

impl Classification {
    /// Total number of classified images.
    pub fn len(&self) -> usize {
        self.retain.len() + self.purge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retain.is_empty() && self.purge.is_empty()
    }
}

/// Order `images` newest first and keep the first `policy.keep`.
///
/// The sort is stable. With `TieBreak::InputOrder`, images sharing a
/// creation timestamp keep their listing order, which the catalog does not
/// guarantee across calls. `keep == 0` purges everything.
pub fn classify(mut images: Vec<ImageRecord>, policy: &RetentionPolicy) -> Classification {
    match policy.tie_break {
        TieBreak::InputOrder => images.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TieBreak::Id => images.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }

    let keep = policy.keep.min(images.len());
    let purge = images.split_off(keep);

    Classification {
        retain: images,
        purge,
    }
}
