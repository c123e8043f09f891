// ABOUTME: Connection settings for reaching the identity and image services.
// ABOUTME: Includes EndpointInterface, TlsConfig, and ConnectionConfig.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which published endpoint of a service to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointInterface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl std::fmt::Display for EndpointInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointInterface::Public => write!(f, "public"),
            EndpointInterface::Internal => write!(f, "internal"),
            EndpointInterface::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for EndpointInterface {
    type Err = String;

    /// Accepts both the v3 names and the legacy `publicURL` style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_end_matches("url") {
            "public" => Ok(EndpointInterface::Public),
            "internal" => Ok(EndpointInterface::Internal),
            "admin" => Ok(EndpointInterface::Admin),
            _ => Err(format!("unknown endpoint interface: {s}")),
        }
    }
}

/// Client certificate and key, both PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// TLS trust settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Extra CA bundle to trust.
    pub ca_cert: Option<PathBuf>,
    /// Client certificate for mutual TLS.
    pub identity: Option<ClientIdentity>,
    /// Skip server certificate verification.
    pub insecure: bool,
}

/// Transport settings shared by identity and image requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub tls: TlsConfig,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            tls: TlsConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
