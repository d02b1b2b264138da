//! # Service Discovery
//!
//! Implements the "find one live service on this port" use case.
//!
//! The search runs in a fixed order and stops at the first hit:
//! 1. `localhost`, then the loopback literal (name resolution of `localhost`
//!    can differ from `127.0.0.1`).
//! 2. The /24 of the primary interface, swept by [`crate::scanner`].
//!
//! Every failure along the way degrades to "try the next step" or "nothing
//! found"; the caller only ever sees a service or `None`.

use std::time::Duration;

use lanseek_common::config::PlatformProfile;
use lanseek_common::network::interface::{self, NetworkInterfaceInfo};
use lanseek_common::network::subnet::SubnetPrefix;
use lanseek_protocols::http;
use tracing::{debug, info, warn};

use crate::network::tcp::{PortProber, TcpProber};
use crate::scanner;
use crate::service::{DiscoveredService, ServiceStatus};

pub const LOCALHOST: &str = "localhost";
pub const LOOPBACK: &str = "127.0.0.1";

/// Source of the interface a sweep is anchored to.
pub trait InterfaceSource: Send + Sync {
    fn primary_interface(&self) -> Option<NetworkInterfaceInfo>;
}

/// Reads the interfaces of this host.
pub struct SystemInterfaces {
    profile: PlatformProfile,
}

impl SystemInterfaces {
    pub fn new(profile: PlatformProfile) -> Self {
        Self { profile }
    }
}

impl InterfaceSource for SystemInterfaces {
    fn primary_interface(&self) -> Option<NetworkInterfaceInfo> {
        interface::select_primary_interface(&self.profile)
    }
}

/// Application service for service discovery.
///
/// Holds no state between calls: a retry is simply another call.
pub struct DiscoveryService {
    interfaces: Box<dyn InterfaceSource>,
    prober: Box<dyn PortProber>,
    profile: PlatformProfile,
}

impl DiscoveryService {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            interfaces: Box::new(SystemInterfaces::new(profile.clone())),
            prober: Box::new(TcpProber),
            profile,
        }
    }

    pub fn with_parts(
        interfaces: Box<dyn InterfaceSource>,
        prober: Box<dyn PortProber>,
        profile: PlatformProfile,
    ) -> Self {
        Self {
            interfaces,
            prober,
            profile,
        }
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Looks for a listener on `port`, loopback first, then the local subnet.
    ///
    /// `timeout` overrides the per-probe timeout of the profile.
    pub async fn find_service(
        &self,
        port: u16,
        timeout: Option<Duration>,
    ) -> Option<DiscoveredService> {
        // A zero timeout means "use the default", never "fail every probe".
        let timeout = timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.profile.probe_timeout);

        for host in [LOCALHOST, LOOPBACK] {
            if self.prober.probe(host, port, timeout).await.open {
                info!("Found service at {host}:{port}");
                return Some(DiscoveredService::new(host, port));
            }
        }

        let Some(primary) = self.interfaces.primary_interface() else {
            warn!("No network interface found");
            return None;
        };

        let prefix = SubnetPrefix::from_masked(primary.address, primary.netmask);
        info!(
            "Scanning network {}: {prefix}.x for port {port} (timeout: {}ms)",
            primary.name,
            timeout.as_millis()
        );

        let hosts = prefix.hosts();
        let found = scanner::sweep(
            self.prober.as_ref(),
            &hosts,
            port,
            timeout,
            self.profile.batch_width,
        )
        .await;

        match found {
            Some(url) => {
                info!("Found service at {url}");
                url_to_service(&url)
            }
            None => {
                info!("No service found on port {port}");
                None
            }
        }
    }

    /// Short fixed-timeout health check of a known address.
    pub async fn is_reachable(&self, host: &str, port: u16) -> bool {
        self.prober
            .probe(host, port, self.profile.health_check_timeout)
            .await
            .open
    }

    /// Returns the saved address when it still answers, otherwise runs a fresh
    /// discovery on `port`.
    pub async fn reconnect(
        &self,
        saved: Option<&str>,
        port: u16,
        timeout: Option<Duration>,
    ) -> Option<DiscoveredService> {
        if let Some(saved) = saved {
            match DiscoveredService::from_url(saved) {
                Ok(service) if self.is_reachable(&service.host, service.port).await => {
                    info!("Saved address {service} is online");
                    return Some(service);
                }
                Ok(service) => info!("Saved address {service} is offline, scanning"),
                Err(e) => warn!("Ignoring saved address: {e}"),
            }
        }

        self.find_service(port, timeout).await
    }

    /// Confirms `service` over TCP, then enriches it over HTTP.
    ///
    /// Meant for addresses of unknown state; a fresh find goes through
    /// [`Self::enrich`] instead.
    pub async fn inspect(&self, service: &DiscoveredService) -> ServiceStatus {
        if !self.is_reachable(&service.host, service.port).await {
            return ServiceStatus::Unreachable;
        }
        self.enrich(service).await
    }

    /// Adds HTTP details to a service whose port is already known to be open.
    /// Always `Reachable`: HTTP failures only drop the metadata.
    pub async fn enrich(&self, service: &DiscoveredService) -> ServiceStatus {
        let metadata = match http::fetch_metadata(&service.host, service.port, http::DEFAULT_TIMEOUT).await
        {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!("No HTTP metadata for {service}: {e}");
                None
            }
        };

        ServiceStatus::Reachable { metadata }
    }
}

impl Default for DiscoveryService {
    fn default() -> Self {
        Self::new(PlatformProfile::current())
    }
}

fn url_to_service(url: &str) -> Option<DiscoveredService> {
    DiscoveredService::from_url(url)
        .inspect_err(|e| warn!("Sweep produced an unusable URL: {e}"))
        .ok()
}

/// Runs a discovery with this platform's defaults.
pub async fn find_service(port: u16, timeout: Option<Duration>) -> Option<DiscoveredService> {
    DiscoveryService::default().find_service(port, timeout).await
}

/// Health check with this platform's defaults.
pub async fn is_reachable(host: &str, port: u16) -> bool {
    DiscoveryService::default().is_reachable(host, port).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
