// ABOUTME: Status events emitted while mutating the catalog.
// ABOUTME: The caller decides how to render them through a StatusSink.

use crate::catalog::ImageRecord;
use crate::types::ImageId;
use std::fmt;

/// Progress notification, emitted just before the matching catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// A retained image is about to have its verification flag cleared.
    UpdatingMetadata { name: String, id: ImageId },
    /// A purged image is about to be deleted.
    Deleting { name: String, id: ImageId },
}

impl StatusEvent {
    pub fn updating_metadata(record: &ImageRecord) -> Self {
        StatusEvent::UpdatingMetadata {
            name: record.name.clone(),
            id: record.id.clone(),
        }
    }

    pub fn deleting(record: &ImageRecord) -> Self {
        StatusEvent::Deleting {
            name: record.name.clone(),
            id: record.id.clone(),
        }
    }

    /// Stable machine-readable event name.
    pub fn kind(&self) -> &'static str {
        match self {
            StatusEvent::UpdatingMetadata { .. } => "updating_metadata",
            StatusEvent::Deleting { .. } => "deleting",
        }
    }

    pub fn image_id(&self) -> &ImageId {
        match self {
            StatusEvent::UpdatingMetadata { id, .. } | StatusEvent::Deleting { id, .. } => id,
        }
    }

    pub fn image_name(&self) -> &str {
        match self {
            StatusEvent::UpdatingMetadata { name, .. } | StatusEvent::Deleting { name, .. } => name,
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::UpdatingMetadata { name, id } => {
                write!(f, "updating metadata for {name} {id}")
            }
            StatusEvent::Deleting { name, id } => write!(f, "deleting duplicate image {name} {id}"),
        }
    }
}

/// Receives status events in execution order.
pub trait StatusSink {
    fn emit(&self, event: &StatusEvent);
}

impl<F> StatusSink for F
where
    F: Fn(&StatusEvent),
{
    fn emit(&self, event: &StatusEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn emit(&self, _event: &StatusEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_image_and_id() {
        let update = StatusEvent::UpdatingMetadata {
            name: "base".to_string(),
            id: ImageId::new("i-1"),
        };
        let delete = StatusEvent::Deleting {
            name: "base".to_string(),
            id: ImageId::new("i-2"),
        };

        assert_eq!(update.to_string(), "updating metadata for base i-1");
        assert_eq!(delete.to_string(), "deleting duplicate image base i-2");
        assert_eq!(update.kind(), "updating_metadata");
        assert_eq!(delete.image_id().as_str(), "i-2");
    }

    #[test]
    fn closures_are_sinks() {
        let seen = std::cell::RefCell::new(Vec::new());
        let sink = |event: &StatusEvent| seen.borrow_mut().push(event.to_string());

        sink.emit(&StatusEvent::Deleting {
            name: "n".to_string(),
            id: ImageId::new("x"),
        });

        assert_eq!(seen.into_inner(), vec!["deleting duplicate image n x"]);
    }
}
