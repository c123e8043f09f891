// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates the image name filter and clamps the retention count.

use serde::Deserialize;

use crate::retention::RetentionPolicy;
use crate::types::ImageName;

pub fn deserialize_image_name<'de, D>(deserializer: D) -> Result<ImageName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageName::new(&s).map_err(serde::de::Error::custom)
}

/// Accepts any integer; values below zero mean "keep none".
pub fn deserialize_keep_releases<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let n = i64::deserialize(deserializer)?;
    Ok(RetentionPolicy::from_signed(n).keep)
}
