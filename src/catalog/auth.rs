// ABOUTME: Keystone v3 token authentication and service catalog lookup.
// ABOUTME: Builds token requests and resolves the image service endpoint.

use super::traits::CatalogError;
use super::types::EndpointInterface;
use crate::types::ProjectId;
use serde::Deserialize;
use serde_json::{Value, json};

/// Service type the image endpoint is published under.
pub const IMAGE_SERVICE_TYPE: &str = "image";

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// A domain, by ID or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRef {
    Id(String),
    Name(String),
}

impl DomainRef {
    fn to_json(&self) -> Value {
        match self {
            DomainRef::Id(id) => json!({ "id": id }),
            DomainRef::Name(name) => json!({ "name": name }),
        }
    }
}

/// A user, by ID or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(String),
    Name { name: String, domain: DomainRef },
}

/// How to prove identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { user: UserRef, password: String },
    ApplicationCredential { id: String, secret: String },
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { user, .. } => f
                .debug_struct("Password")
                .field("user", user)
                .finish_non_exhaustive(),
            Credentials::ApplicationCredential { id, .. } => f
                .debug_struct("ApplicationCredential")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}

/// Project to scope the token to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    Id(String),
    Name { name: String, domain: DomainRef },
}

/// Everything needed to obtain a token and find the image endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOptions {
    pub identity_endpoint: String,
    pub credentials: Credentials,
    pub scope: Option<ProjectScope>,
    pub region: Option<String>,
    pub interface: EndpointInterface,
}

/// An issued token and the image endpoint it unlocks.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub image_endpoint: String,
    pub project: Option<ProjectId>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("image_endpoint", &self.image_endpoint)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    project: Option<ProjectInfo>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    id: ProjectId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

/// URL of the token endpoint for an identity endpoint, with or without `/v3`.
pub fn tokens_url(identity_endpoint: &str) -> String {
    let base = identity_endpoint.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{base}/auth/tokens")
    } else {
        format!("{base}/v3/auth/tokens")
    }
}

/// JSON body for `POST /v3/auth/tokens`.
pub fn token_request_body(opts: &AuthOptions) -> Value {
    let identity = match &opts.credentials {
        Credentials::Password { user, password } => {
            let user = match user {
                UserRef::Id(id) => json!({ "id": id, "password": password }),
                UserRef::Name { name, domain } => json!({
                    "name": name,
                    "domain": domain.to_json(),
                    "password": password,
                }),
            };
            json!({ "methods": ["password"], "password": { "user": user } })
        }
        Credentials::ApplicationCredential { id, secret } => json!({
            "methods": ["application_credential"],
            "application_credential": { "id": id, "secret": secret },
        }),
    };

    let mut auth = json!({ "identity": identity });

    // Application credentials carry their own scope and reject an explicit one.
    if let (Some(scope), Credentials::Password { .. }) = (&opts.scope, &opts.credentials) {
        let project = match scope {
            ProjectScope::Id(id) => json!({ "id": id }),
            ProjectScope::Name { name, domain } => {
                json!({ "name": name, "domain": domain.to_json() })
            }
        };
        auth["scope"] = json!({ "project": project });
    }

    json!({ "auth": auth })
}

/// Pick the endpoint URL for a service from a token's catalog.
pub(crate) fn select_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    interface: EndpointInterface,
    region: Option<&str>,
) -> Result<String, CatalogError> {
    let wanted = interface.to_string();
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|ep| {
            ep.interface == wanted
                && region.is_none_or(|r| {
                    ep.region_id.as_deref() == Some(r) || ep.region.as_deref() == Some(r)
                })
        })
        .map(|ep| ep.url.trim_end_matches('/').to_string())
        .ok_or_else(|| CatalogError::EndpointNotFound {
            service: service_type.to_string(),
            detail: match region {
                Some(r) => format!("interface {wanted}, region {r}"),
                None => format!("interface {wanted}"),
            },
        })
}

/// Obtain a token and resolve the image endpoint.
pub async fn authenticate(
    http: &reqwest::Client,
    opts: &AuthOptions,
) -> Result<Session, CatalogError> {
    let url = tokens_url(&opts.identity_endpoint);
    tracing::debug!(url = %url, "requesting token");

    let response = http
        .post(&url)
        .json(&token_request_body(opts))
        .send()
        .await
        .map_err(|e| CatalogError::Authentication(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Authentication(format!(
            "identity service returned HTTP {}: {}",
            status.as_u16(),
            truncate(&body)
        )));
    }

    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            CatalogError::Authentication("response missing X-Subject-Token header".to_string())
        })?;

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| CatalogError::Decode(format!("token response: {e}")))?;

    let image_endpoint = select_endpoint(
        &body.token.catalog,
        IMAGE_SERVICE_TYPE,
        opts.interface,
        opts.region.as_deref(),
    )?;

    tracing::debug!(endpoint = %image_endpoint, "resolved image endpoint");

    Ok(Session {
        token,
        image_endpoint,
        project: body.token.project.map(|p| p.id),
    })
}

pub(crate) fn truncate(body: &str) -> &str {
    const LIMIT: usize = 512;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
