// ABOUTME: Credentials, endpoint, and TLS settings for reaching the image catalog.
// ABOUTME: Falls back to the standard OS_* environment variables for unset fields.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::EnvValue;
use crate::catalog::{
    AuthOptions, ClientIdentity, ConnectionConfig, Credentials, DomainRef, EndpointInterface,
    ProjectScope, TlsConfig, UserRef,
};
use crate::error::{Error, Result};

/// Domain assumed for user and project names when none is configured.
pub const DEFAULT_DOMAIN_ID: &str = "default";

#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    #[serde(default, alias = "auth_url")]
    pub identity_endpoint: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    #[serde(default, alias = "project_id")]
    pub tenant_id: Option<String>,

    #[serde(default, alias = "project_name")]
    pub tenant_name: Option<String>,

    #[serde(default)]
    pub domain_id: Option<String>,

    #[serde(default)]
    pub domain_name: Option<String>,

    #[serde(default)]
    pub application_credential_id: Option<String>,

    #[serde(default)]
    pub application_credential_secret: Option<EnvValue>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub endpoint_type: Option<String>,

    #[serde(default)]
    pub cacert: Option<PathBuf>,

    #[serde(default)]
    pub cert: Option<PathBuf>,

    #[serde(default)]
    pub key: Option<PathBuf>,

    #[serde(default)]
    pub insecure: Option<bool>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            identity_endpoint: None,
            user_id: None,
            username: None,
            password: None,
            tenant_id: None,
            tenant_name: None,
            domain_id: None,
            domain_name: None,
            application_credential_id: None,
            application_credential_secret: None,
            region: None,
            endpoint_type: None,
            cacert: None,
            cert: None,
            key: None,
            insecure: None,
            timeout: default_timeout(),
        }
    }
}

/// First non-empty value among the given environment variables.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}

fn is_unset(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(str::is_empty)
}

fn fill(field: &mut Option<String>, names: &[&str]) {
    if is_unset(field) {
        *field = env_any(names);
    }
}

/// Fill an id/name pair only when neither half is configured.
///
/// The id wins over the name when both are set, so filling one half from the
/// environment could override the half the config chose.
fn fill_pair(
    id: &mut Option<String>,
    id_names: &[&str],
    name: &mut Option<String>,
    name_names: &[&str],
) {
    if is_unset(id) && is_unset(name) {
        *id = env_any(id_names);
        *name = env_any(name_names);
    }
}

fn fill_path(field: &mut Option<PathBuf>, names: &[&str]) {
    if field.is_none() {
        *field = env_any(names).map(PathBuf::from);
    }
}

fn fill_secret(field: &mut Option<EnvValue>, names: &[&str]) {
    if field.is_none() {
        *field = env_any(names).map(EnvValue::Literal);
    }
}

impl AccessConfig {
    /// Fill unset settings from the `OS_*` environment variables.
    ///
    /// Related fields fall back as a group: a configured user, project,
    /// domain, credential kind, or client certificate is never mixed with
    /// environment values for its other half.
    pub fn with_env_defaults(mut self) -> Self {
        fill(&mut self.identity_endpoint, &["OS_AUTH_URL"]);
        self.fill_credentials();
        fill_pair(
            &mut self.tenant_id,
            &["OS_PROJECT_ID", "OS_TENANT_ID"],
            &mut self.tenant_name,
            &["OS_PROJECT_NAME", "OS_TENANT_NAME"],
        );
        fill_pair(
            &mut self.domain_id,
            &["OS_USER_DOMAIN_ID", "OS_PROJECT_DOMAIN_ID", "OS_DOMAIN_ID"],
            &mut self.domain_name,
            &["OS_USER_DOMAIN_NAME", "OS_PROJECT_DOMAIN_NAME", "OS_DOMAIN_NAME"],
        );
        fill(&mut self.region, &["OS_REGION_NAME"]);
        fill(&mut self.endpoint_type, &["OS_INTERFACE", "OS_ENDPOINT_TYPE"]);
        fill_path(&mut self.cacert, &["OS_CACERT"]);
        if self.cert.is_none() && self.key.is_none() {
            fill_path(&mut self.cert, &["OS_CERT"]);
            fill_path(&mut self.key, &["OS_KEY"]);
        }

        if self.insecure.is_none() {
            self.insecure = env_any(&["OS_INSECURE"])
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
        }

        self
    }

    /// An application credential from the environment is only taken when the
    /// config names no user and no password. Only the secret of a configured
    /// application credential, or the password of a configured user, comes
    /// from the environment.
    fn fill_credentials(&mut self) {
        let user_configured =
            !is_unset(&self.user_id) || !is_unset(&self.username) || self.password.is_some();

        if is_unset(&self.application_credential_id) && !user_configured {
            self.application_credential_id = env_any(&["OS_APPLICATION_CREDENTIAL_ID"]);
        }

        if is_unset(&self.application_credential_id) {
            fill_pair(
                &mut self.user_id,
                &["OS_USER_ID", "OS_USERID"],
                &mut self.username,
                &["OS_USERNAME"],
            );
            fill_secret(&mut self.password, &["OS_PASSWORD"]);
        } else {
            fill_secret(
                &mut self.application_credential_secret,
                &["OS_APPLICATION_CREDENTIAL_SECRET"],
            );
        }
    }

    fn domain(&self) -> DomainRef {
        match (&self.domain_id, &self.domain_name) {
            (Some(id), _) => DomainRef::Id(id.clone()),
            (None, Some(name)) => DomainRef::Name(name.clone()),
            (None, None) => DomainRef::Id(DEFAULT_DOMAIN_ID.to_string()),
        }
    }

    /// Validate and convert into client options.
    ///
    /// Every problem is reported at once, joined with `; `.
    pub fn prepare(&self) -> Result<(AuthOptions, ConnectionConfig)> {
        let mut problems = Vec::new();

        let identity_endpoint = match &self.identity_endpoint {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                problems.push("identity_endpoint is required (or set OS_AUTH_URL)".to_string());
                String::new()
            }
        };

        let credentials = self.credentials(&mut problems);

        let scope = match (&self.tenant_id, &self.tenant_name) {
            (Some(id), _) => Some(ProjectScope::Id(id.clone())),
            (None, Some(name)) => Some(ProjectScope::Name {
                name: name.clone(),
                domain: self.domain(),
            }),
            (None, None) => None,
        };

        let interface = match &self.endpoint_type {
            None => EndpointInterface::default(),
            Some(s) => s.parse().unwrap_or_else(|e: String| {
                problems.push(e);
                EndpointInterface::default()
            }),
        };

        let identity = match (&self.cert, &self.key) {
            (Some(cert), Some(key)) => Some(ClientIdentity {
                cert: cert.clone(),
                key: key.clone(),
            }),
            (Some(_), None) => {
                problems.push("cert requires key".to_string());
                None
            }
            (None, Some(_)) => {
                problems.push("key requires cert".to_string());
                None
            }
            (None, None) => None,
        };

        let (Some(credentials), true) = (credentials, problems.is_empty()) else {
            return Err(Error::InvalidConfig(problems.join("; ")));
        };

        let auth = AuthOptions {
            identity_endpoint,
            credentials,
            scope,
            region: self.region.clone(),
            interface,
        };

        let connection = ConnectionConfig {
            tls: TlsConfig {
                ca_cert: self.cacert.clone(),
                identity,
                insecure: self.insecure.unwrap_or(false),
            },
            timeout: self.timeout,
        };

        Ok((auth, connection))
    }

    fn credentials(&self, problems: &mut Vec<String>) -> Option<Credentials> {
        if let Some(id) = &self.application_credential_id {
            let secret = match &self.application_credential_secret {
                Some(secret) => secret.resolve(),
                None => {
                    problems.push(
                        "application_credential_id requires application_credential_secret"
                            .to_string(),
                    );
                    return None;
                }
            };
            return match secret {
                Ok(secret) => Some(Credentials::ApplicationCredential {
                    id: id.clone(),
                    secret,
                }),
                Err(e) => {
                    problems.push(e.to_string());
                    None
                }
            };
        }

        let user = match (&self.user_id, &self.username) {
            (Some(id), _) => UserRef::Id(id.clone()),
            (None, Some(name)) => UserRef::Name {
                name: name.clone(),
                domain: self.domain(),
            },
            (None, None) => {
                problems.push(
                    "one of username, user_id, or application_credential_id is required"
                        .to_string(),
                );
                return None;
            }
        };

        match self.password.as_ref().map(EnvValue::resolve) {
            Some(Ok(password)) => Some(Credentials::Password { user, password }),
            Some(Err(e)) => {
                problems.push(e.to_string());
                None
            }
            None => {
                problems.push("password is required (or set OS_PASSWORD)".to_string());
                None
            }
        }
    }
}
