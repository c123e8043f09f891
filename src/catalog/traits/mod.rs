// ABOUTME: Capability trait the retention core uses to talk to an image catalog.
// ABOUTME: Defines ImageCatalog plus the records, pages, and patches it exchanges.

mod image;
mod shared_types;

pub use image::{CatalogError, ImageCatalog};
pub use shared_types::*;
