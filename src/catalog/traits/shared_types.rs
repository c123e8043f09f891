// ABOUTME: Shared types exchanged through the ImageCatalog trait.
// ABOUTME: ImageRecord, ListQuery, ImagePage, PageCursor, and MetadataPatch.

use crate::types::{ImageId, ImageName, ProjectId};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Property the catalog sets once an image passed signature verification.
pub const VERIFICATION_PROPERTY: &str = "signature_verified";

/// Read snapshot of one catalog image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Catalog-assigned identifier.
    pub id: ImageId,
    /// Display name.
    pub name: String,
    /// Creation time, assigned by the catalog.
    pub created_at: DateTime<Utc>,
    /// Lifecycle status (`active`, `queued`, ...).
    pub status: String,
    /// Owning project, when the catalog reports one.
    pub owner: Option<ProjectId>,
    /// Every other property the catalog returned, untouched.
    pub properties: Map<String, Value>,
}

impl ImageRecord {
    pub fn new(id: ImageId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at,
            status: "active".to_string(),
            owner: None,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Whether the verification flag is present and set.
    ///
    /// The image service stores extra properties as strings, so both a JSON
    /// boolean and the strings `"true"`/`"True"` count.
    pub fn is_verified(&self) -> bool {
        match self.properties.get(VERIFICATION_PROPERTY) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Which images a listing asks for.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Exact image name to match.
    pub name: ImageName,
    /// Page size hint; the catalog's default applies when absent.
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn by_name(name: &ImageName) -> Self {
        Self {
            name: name.clone(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Opaque position of the next page, produced by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct ImagePage {
    pub images: Vec<ImageRecord>,
    /// `None` when this is the last page.
    pub next: Option<PageCursor>,
}

/// A single metadata operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOp {
    /// Remove a property; a no-op when the image does not carry it.
    Remove { property: String },
}

/// An ordered list of metadata operations applied atomically to one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPatch {
    ops: Vec<PatchOp>,
}

impl MetadataPatch {
    /// Patch that removes one property.
    pub fn remove(property: impl Into<String>) -> Self {
        Self {
            ops: vec![PatchOp::Remove {
                property: property.into(),
            }],
        }
    }

    /// Patch that clears the verification flag.
    pub fn clear_verification() -> Self {
        Self::remove(VERIFICATION_PROPERTY)
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// True when every operation only removes properties.
    pub fn is_remove_only(&self) -> bool {
        self.ops
            .iter()
            .all(|op| matches!(op, PatchOp::Remove { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ImageRecord {
        ImageRecord::new(ImageId::new("img-1"), "base", Utc::now())
    }

    #[test]
    fn verification_flag_accepts_string_and_bool() {
        assert!(!record().is_verified());
        assert!(
            record()
                .with_property(VERIFICATION_PROPERTY, Value::String("True".into()))
                .is_verified()
        );
        assert!(
            record()
                .with_property(VERIFICATION_PROPERTY, Value::Bool(true))
                .is_verified()
        );
        assert!(
            !record()
                .with_property(VERIFICATION_PROPERTY, Value::String("false".into()))
                .is_verified()
        );
    }

    #[test]
    fn clear_verification_is_remove_only() {
        let patch = MetadataPatch::clear_verification();
        assert!(patch.is_remove_only());
        assert_eq!(
            patch.ops(),
            &[PatchOp::Remove {
                property: VERIFICATION_PROPERTY.to_string()
            }]
        );
    }
}
