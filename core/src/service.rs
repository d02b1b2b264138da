use std::fmt;

use lanseek_protocols::http::ServiceMetadata;
use reqwest::Url;
use thiserror::Error;

/// The single `(host, port)` pair a discovery call commits to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredService {
    pub url: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceUrlError {
    #[error("'{0}' is not a valid URL")]
    Invalid(String),

    #[error("'{0}' has no host")]
    MissingHost(String),

    #[error("'{0}' has no port and no default port for its scheme")]
    MissingPort(String),
}

impl DiscoveredService {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            url: format!("http://{host}:{port}"),
            host,
            port,
        }
    }

    /// Parses a previously saved base URL. Only host and port are kept.
    pub fn from_url(url: &str) -> Result<Self, ServiceUrlError> {
        let parsed = Url::parse(url.trim()).map_err(|_| ServiceUrlError::Invalid(url.to_string()))?;
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ServiceUrlError::MissingHost(url.to_string()))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| ServiceUrlError::MissingPort(url.to_string()))?;

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for DiscoveredService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Reachability of a service plus whatever HTTP details could be fetched.
///
/// `Reachable { metadata: None }` means the port is open but did not speak
/// HTTP (or the request failed); the TCP verdict is never downgraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Reachable { metadata: Option<ServiceMetadata> },
    Unreachable,
}

impl ServiceStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ServiceStatus::Reachable { .. })
    }

    pub fn metadata(&self) -> Option<&ServiceMetadata> {
        match self {
            ServiceStatus::Reachable { metadata } => metadata.as_ref(),
            ServiceStatus::Unreachable => None,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
