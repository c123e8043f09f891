// ABOUTME: Validated image family name used as the retention filter.
// ABOUTME: Enforces the catalog's name limits before any request is made.

use std::fmt;
use thiserror::Error;

/// Longest name the image service accepts.
pub const MAX_IMAGE_NAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("image name exceeds maximum length of {MAX_IMAGE_NAME_LEN} characters")]
    TooLong,

    #[error("image name cannot start or end with whitespace")]
    SurroundingWhitespace,

    #[error("invalid control character in image name: {0:?}")]
    ControlChar(char),
}

/// The name shared by every image in a retained family.
///
/// Matching is exact equality, performed by the catalog. There is no
/// pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageName(String);

impl ImageName {
    pub fn new(value: &str) -> Result<Self, ImageNameError> {
        if value.is_empty() {
            return Err(ImageNameError::Empty);
        }

        if value.chars().count() > MAX_IMAGE_NAME_LEN {
            return Err(ImageNameError::TooLong);
        }

        if value.trim() != value {
            return Err(ImageNameError::SurroundingWhitespace);
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ImageNameError::ControlChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a catalog record carries exactly this name.
    pub fn matches(&self, name: &str) -> bool {
        self.0 == name
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
