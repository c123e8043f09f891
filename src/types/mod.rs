// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod image_name;

pub use id::{ImageId, ProjectId};
pub use image_name::{ImageName, ImageNameError, MAX_IMAGE_NAME_LEN};
