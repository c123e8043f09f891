// ABOUTME: Configuration types and parsing for image-retention.yml.
// ABOUTME: Handles YAML parsing, discovery, and conversion into run settings.

mod access;
mod deserialize;
mod env_value;
mod init;

pub use access::{AccessConfig, DEFAULT_DOMAIN_ID};
pub use env_value::EnvValue;
pub use init::init_config;

use crate::catalog::{AuthOptions, ConnectionConfig};
use crate::error::{Error, Result};
use crate::retention::{FailurePolicy, RetentionPolicy, RetentionSettings, TieBreak};
use crate::types::ImageName;
use deserialize::{deserialize_image_name, deserialize_keep_releases};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "image-retention.yml";
pub const CONFIG_FILENAME_ALT: &str = "image-retention.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".image-retention/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_image_name")]
    pub identifier: ImageName,

    #[serde(deserialize_with = "deserialize_keep_releases")]
    pub keep_releases: usize,

    #[serde(default)]
    pub on_error: FailurePolicy,

    #[serde(default)]
    pub tie_break: TieBreak,

    #[serde(default)]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub access: AccessConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Settings for one retention run.
    pub fn settings(&self) -> RetentionSettings {
        RetentionSettings::new(
            self.identifier.clone(),
            RetentionPolicy::keep(self.keep_releases).with_tie_break(self.tie_break),
        )
        .with_failure_policy(self.on_error)
        .with_page_size(self.page_size)
    }

    /// Client options, with `OS_*` environment fallbacks applied.
    pub fn connection_options(&self) -> Result<(AuthOptions, ConnectionConfig)> {
        self.access.clone().with_env_defaults().prepare()
    }

    pub fn template() -> Self {
        Config {
            identifier: ImageName::new("my-image").expect("template name is valid"),
            keep_releases: 3,
            on_error: FailurePolicy::default(),
            tie_break: TieBreak::default(),
            page_size: None,
            access: AccessConfig::default(),
        }
    }
}
