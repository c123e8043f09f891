// ABOUTME: Image catalog access: the ImageCatalog trait and its Glance implementation.
// ABOUTME: Keystone authentication and TLS setup live here, outside the retention core.

pub mod auth;
mod glance;
pub mod traits;
mod types;

pub use auth::{AuthOptions, Credentials, DomainRef, ProjectScope, Session, UserRef};
pub use glance::{GlanceClient, build_http_client};
pub use traits::{
    CatalogError, ImageCatalog, ImagePage, ImageRecord, ListQuery, MetadataPatch, PageCursor,
    PatchOp, VERIFICATION_PROPERTY,
};
pub use types::{ClientIdentity, ConnectionConfig, EndpointInterface, TlsConfig};
