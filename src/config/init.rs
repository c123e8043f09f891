// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates image-retention.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::retention::RetentionPolicy;
use crate::types::ImageName;

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    identifier: Option<&str>,
    keep: Option<i64>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(name) = identifier {
        config.identifier =
            ImageName::new(name).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(keep) = keep {
        config.keep_releases = RetentionPolicy::from_signed(keep).keep;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"# Image family to manage: every image with exactly this name.
identifier: {}
# Number of most recent images to keep; older ones are deleted.
keep_releases: {}
# fail-fast stops at the first failed patch or delete; continue tries them all.
on_error: fail-fast

access:
  # Unset fields fall back to OS_AUTH_URL, OS_USERNAME, OS_PASSWORD, ...
  identity_endpoint: https://keystone.example.com:5000/v3
  username: packer
  password:
    env: OS_PASSWORD
  domain_name: Default
  tenant_name: builds
  # region: RegionOne
  # cacert: /etc/ssl/certs/openstack-ca.pem
  # insecure: false
"#,
        yaml_quoted(config.identifier.as_str()),
        config.keep_releases
    )
}

fn yaml_quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
