// ABOUTME: Glance v2 implementation of the ImageCatalog trait over HTTPS.
// ABOUTME: Handles TLS setup, token re-authentication, and next-link pagination.

use super::auth::{AuthOptions, Session, authenticate, truncate};
use super::traits::{
    CatalogError, ImageCatalog, ImagePage, ImageRecord, ListQuery, MetadataPatch, PageCursor,
    PatchOp,
};
use super::types::ConnectionConfig;
use crate::types::{ImageId, ProjectId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const JSON_PATCH_CONTENT_TYPE: &str = "application/openstack-images-v2.1-json-patch";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ImageListResponse {
    #[serde(default)]
    images: Vec<GlanceImage>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlanceImage {
    id: ImageId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    owner: Option<ProjectId>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<GlanceImage> for ImageRecord {
    fn from(image: GlanceImage) -> Self {
        ImageRecord {
            id: image.id,
            name: image.name.unwrap_or_default(),
            created_at: image.created_at,
            status: image.status.unwrap_or_default(),
            owner: image.owner,
            properties: image.extra,
        }
    }
}

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_request_error(e: reqwest::Error, url: &str) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Request(format!("request to {url} timed out"))
    } else if e.is_connect() {
        CatalogError::Request(format!("failed to connect to {url}: {e}"))
    } else {
        CatalogError::Request(format!("{url}: {e}"))
    }
}

async fn check_status(response: Response, subject: &str) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => CatalogError::Authentication(format!(
            "token rejected for {subject}: {}",
            truncate(&body)
        )),
        // Also returned for protected images, so not an authentication failure.
        StatusCode::FORBIDDEN => CatalogError::Forbidden {
            subject: subject.to_string(),
            message: truncate(&body).to_string(),
        },
        StatusCode::NOT_FOUND => CatalogError::NotFound(subject.to_string()),
        _ => CatalogError::Status {
            status: status.as_u16(),
            message: truncate(&body).to_string(),
        },
    })
}

// =============================================================================
// URL Helpers
// =============================================================================

/// `{endpoint}/v2/images`, tolerating endpoints that already end in `/v2`.
fn images_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let base = base.strip_suffix("/v2").unwrap_or(base);
    format!("{base}/v2/images")
}

fn image_url(endpoint: &str, id: &ImageId) -> String {
    format!(
        "{}/{}",
        images_url(endpoint),
        urlencoding::encode(id.as_str())
    )
}

/// Resolve the `next` link of a listing against the URL that produced it.
///
/// Glance returns a path such as `/v2/images?marker=...`. Endpoints mounted
/// under a path prefix (`https://host/image`) keep that prefix.
fn resolve_next(current: &Url, next: &str) -> Result<Url, CatalogError> {
    if next.starts_with("http://") || next.starts_with("https://") {
        return Url::parse(next)
            .map_err(|e| CatalogError::Decode(format!("invalid next link {next}: {e}")));
    }

    let (next_path, next_query) = match next.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (next, None),
    };

    let prefix = current
        .path()
        .find("/v2/")
        .map(|idx| &current.path()[..idx])
        .unwrap_or("");

    let mut resolved = current.clone();
    resolved.set_path(&format!("{prefix}{next_path}"));
    resolved.set_query(next_query);
    Ok(resolved)
}

fn json_patch(patch: &MetadataPatch) -> Value {
    Value::Array(
        patch
            .ops()
            .iter()
            .map(|op| match op {
                PatchOp::Remove { property } => {
                    json!({ "op": "remove", "path": format!("/{property}") })
                }
            })
            .collect(),
    )
}

/// Build the HTTP client, applying CA, client certificate, and insecure mode.
pub fn build_http_client(config: &ConnectionConfig) -> Result<reqwest::Client, CatalogError> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("image-retention/", env!("CARGO_PKG_VERSION")));

    if let Some(ca_path) = &config.tls.ca_cert {
        let pem = std::fs::read(ca_path).map_err(|e| {
            CatalogError::Configuration(format!(
                "failed to read CA file {}: {e}",
                ca_path.display()
            ))
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            CatalogError::Configuration(format!("invalid CA file {}: {e}", ca_path.display()))
        })?;
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    if let Some(identity) = &config.tls.identity {
        let mut pem = std::fs::read(&identity.cert).map_err(|e| {
            CatalogError::Configuration(format!(
                "failed to read client certificate {}: {e}",
                identity.cert.display()
            ))
        })?;
        let key = std::fs::read(&identity.key).map_err(|e| {
            CatalogError::Configuration(format!(
                "failed to read client key {}: {e}",
                identity.key.display()
            ))
        })?;
        pem.push(b'\n');
        pem.extend_from_slice(&key);
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| CatalogError::Configuration(format!("invalid client identity: {e}")))?;
        builder = builder.identity(identity);
    }

    if config.tls.insecure {
        tracing::warn!("TLS certificate verification disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| CatalogError::Configuration(format!("failed to build HTTP client: {e}")))
}

// =============================================================================
// GlanceClient
// =============================================================================

/// Authenticated Glance v2 client.
///
/// Holds one token for its lifetime. A 401 on any call triggers a single
/// re-authentication and a repeat of that call.
pub struct GlanceClient {
    http: reqwest::Client,
    auth: AuthOptions,
    session: RwLock<Session>,
}

impl std::fmt::Debug for GlanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlanceClient")
            .field("session", &*self.session.read())
            .finish_non_exhaustive()
    }
}

impl GlanceClient {
    /// Authenticate and resolve the image endpoint.
    pub async fn connect(
        auth: AuthOptions,
        connection: &ConnectionConfig,
    ) -> Result<Self, CatalogError> {
        let http = build_http_client(connection)?;
        let session = authenticate(&http, &auth).await?;

        Ok(Self {
            http,
            auth,
            session: RwLock::new(session),
        })
    }

    /// The resolved image service endpoint.
    pub fn endpoint(&self) -> String {
        self.session.read().image_endpoint.clone()
    }

    /// Project the token is scoped to, if any.
    pub fn project(&self) -> Option<ProjectId> {
        self.session.read().project.clone()
    }

    async fn reauthenticate(&self) -> Result<(), CatalogError> {
        tracing::warn!("token rejected, re-authenticating");
        let session = authenticate(&self.http, &self.auth).await?;
        *self.session.write() = session;
        Ok(())
    }

    /// Send a request built against the current endpoint, re-authenticating
    /// once on 401.
    async fn send<F>(&self, build: F) -> Result<Response, CatalogError>
    where
        F: Fn(&reqwest::Client, &str) -> Result<RequestBuilder, CatalogError> + Send + Sync,
    {
        let mut reauthenticated = false;
        loop {
            let (endpoint, token) = {
                let session = self.session.read();
                (session.image_endpoint.clone(), session.token.clone())
            };

            let request = build(&self.http, &endpoint)?
                .header(AUTH_TOKEN_HEADER, token)
                .build()
                .map_err(|e| CatalogError::Request(e.to_string()))?;
            let url = request.url().to_string();

            let response = self
                .http
                .execute(request)
                .await
                .map_err(|e| map_request_error(e, &url))?;

            if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated {
                reauthenticated = true;
                self.reauthenticate().await?;
                continue;
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl ImageCatalog for GlanceClient {
    async fn list_page(
        &self,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ImagePage, CatalogError> {
        let response = self
            .send(|http, endpoint| match cursor {
                Some(next) => Ok(http.get(next.as_str())),
                None => {
                    let mut url = Url::parse(&images_url(endpoint))
                        .map_err(|e| CatalogError::Configuration(e.to_string()))?;
                    {
                        let mut pairs = url.query_pairs_mut();
                        pairs.append_pair("name", query.name.as_str());
                        if let Some(limit) = query.limit {
                            pairs.append_pair("limit", &limit.to_string());
                        }
                    }
                    Ok(http.get(url))
                }
            })
            .await?;

        let current = response.url().clone();
        let response = check_status(response, query.name.as_str()).await?;
        let body: ImageListResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(format!("image list: {e}")))?;

        let next = body
            .next
            .as_deref()
            .map(|next| resolve_next(&current, next))
            .transpose()?
            .map(|url| PageCursor::new(url.to_string()));

        tracing::debug!(
            count = body.images.len(),
            has_next = next.is_some(),
            "fetched image page"
        );

        Ok(ImagePage {
            images: body.images.into_iter().map(ImageRecord::from).collect(),
            next,
        })
    }

    async fn update_metadata(
        &self,
        id: &ImageId,
        patch: &MetadataPatch,
    ) -> Result<(), CatalogError> {
        let body = json_patch(patch);
        let response = self
            .send(|http, endpoint| {
                Ok(http
                    .request(Method::PATCH, image_url(endpoint, id))
                    .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
                    .body(body.to_string()))
            })
            .await?;

        // Glance answers 409 when removing a property the image lacks.
        if response.status() == StatusCode::CONFLICT && patch.is_remove_only() {
            tracing::debug!(image = %id, "property already absent");
            return Ok(());
        }

        check_status(response, id.as_str()).await?;
        Ok(())
    }

    async fn delete_image(&self, id: &ImageId) -> Result<(), CatalogError> {
        let response = self
            .send(|http, endpoint| Ok(http.delete(image_url(endpoint, id))))
            .await?;

        check_status(response, id.as_str()).await?;
        Ok(())
    }
}
