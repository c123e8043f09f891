// ABOUTME: In-memory image catalog that records every call it receives.
// ABOUTME: Serves paginated listings and injects failures or stalls on demand.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use image_retention::catalog::{
    CatalogError, ImageCatalog, ImagePage, ImageRecord, ListQuery, MetadataPatch, PageCursor,
    PatchOp,
};
use image_retention::retention::{StatusEvent, StatusSink};
use image_retention::types::ImageId;
use parking_lot::Mutex;
use std::collections::HashSet;

/// One call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { cursor: Option<String> },
    Update { id: String, removed: Vec<String> },
    Delete { id: String },
}

#[derive(Default)]
struct State {
    pages: Vec<Vec<ImageRecord>>,
    calls: Vec<Call>,
    limits: Vec<Option<u32>>,
    fail_list_page: Option<usize>,
    repeat_cursor: bool,
    wrap_cursor: bool,
    fail_update: HashSet<String>,
    fail_delete: HashSet<String>,
    stall_delete: HashSet<String>,
}

#[derive(Default)]
pub struct MockCatalog {
    state: Mutex<State>,
}

impl MockCatalog {
    /// A catalog serving all images on a single page.
    pub fn with_images(images: Vec<ImageRecord>) -> Self {
        Self::with_pages(vec![images])
    }

    /// A catalog serving the given pages in order.
    pub fn with_pages(pages: Vec<Vec<ImageRecord>>) -> Self {
        let catalog = Self::default();
        catalog.state.lock().pages = pages;
        catalog
    }

    /// Fail the listing request for page `index` (0-based).
    pub fn fail_list_on_page(self, index: usize) -> Self {
        self.state.lock().fail_list_page = Some(index);
        self
    }

    /// Hand back the incoming cursor instead of advancing.
    pub fn repeat_cursor(self) -> Self {
        self.state.lock().repeat_cursor = true;
        self
    }

    /// Point the last page back at the first one.
    pub fn wrap_cursor(self) -> Self {
        self.state.lock().wrap_cursor = true;
        self
    }

    pub fn fail_update_of(self, id: &str) -> Self {
        self.state.lock().fail_update.insert(id.to_string());
        self
    }

    pub fn fail_delete_of(self, id: &str) -> Self {
        self.state.lock().fail_delete.insert(id.to_string());
        self
    }

    /// Never complete the delete of `id`.
    pub fn stall_delete_of(self, id: &str) -> Self {
        self.state.lock().stall_delete.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Only the mutating calls, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::List { .. }))
            .collect()
    }

    pub fn list_limits(&self) -> Vec<Option<u32>> {
        self.state.lock().limits.clone()
    }
}

fn cursor_for(index: usize) -> PageCursor {
    PageCursor::new(format!("page-{index}"))
}

fn page_index(cursor: Option<&PageCursor>) -> usize {
    cursor
        .and_then(|c| c.as_str().strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl ImageCatalog for MockCatalog {
    async fn list_page(
        &self,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ImagePage, CatalogError> {
        let mut state = self.state.lock();
        state.calls.push(Call::List {
            cursor: cursor.map(|c| c.as_str().to_string()),
        });
        state.limits.push(query.limit);

        let index = page_index(cursor);
        if state.fail_list_page == Some(index) {
            return Err(CatalogError::Status {
                status: 503,
                message: "image service unavailable".to_string(),
            });
        }

        let images = state
            .pages
            .get(index)
            .map(|page| {
                page.iter()
                    .filter(|image| query.name.matches(&image.name))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let next = if state.repeat_cursor {
            Some(cursor.cloned().unwrap_or_else(|| cursor_for(0)))
        } else if index + 1 < state.pages.len() {
            Some(cursor_for(index + 1))
        } else if state.wrap_cursor {
            Some(cursor_for(0))
        } else {
            None
        };

        Ok(ImagePage { images, next })
    }

    async fn update_metadata(
        &self,
        id: &ImageId,
        patch: &MetadataPatch,
    ) -> Result<(), CatalogError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Update {
            id: id.to_string(),
            removed: patch
                .ops()
                .iter()
                .map(|op| match op {
                    PatchOp::Remove { property } => property.clone(),
                })
                .collect(),
        });

        if state.fail_update.contains(id.as_str()) {
            return Err(CatalogError::Status {
                status: 500,
                message: "update rejected".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_image(&self, id: &ImageId) -> Result<(), CatalogError> {
        let stall = {
            let mut state = self.state.lock();
            state.calls.push(Call::Delete { id: id.to_string() });

            if state.fail_delete.contains(id.as_str()) {
                return Err(CatalogError::Status {
                    status: 500,
                    message: "delete rejected".to_string(),
                });
            }
            state.stall_delete.contains(id.as_str())
        };

        if stall {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// Status sink that keeps every event it sees.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, event: &StatusEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Timestamp `day` days into 2024.
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

pub fn image(id: &str, name: &str, created_at: DateTime<Utc>) -> ImageRecord {
    ImageRecord::new(ImageId::new(id), name, created_at)
}

pub fn update(id: &str) -> Call {
    Call::Update {
        id: id.to_string(),
        removed: vec!["signature_verified".to_string()],
    }
}

pub fn delete(id: &str) -> Call {
    Call::Delete { id: id.to_string() }
}
