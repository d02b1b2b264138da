use std::fmt;
use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::{debug, info};

use crate::config::PlatformProfile;

/// The outward facing IPv4 address discovery is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterfaceInfo {
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub name: String,
}

impl fmt::Display for NetworkInterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.address, self.netmask)
    }
}

/// Finds the primary interface of this host.
///
/// Returns `None` when the host has no usable IPv4 network, which callers treat
/// as "no network" rather than as an error.
pub fn select_primary_interface(profile: &PlatformProfile) -> Option<NetworkInterfaceInfo> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    debug!("Identified {} network interface(s)", interfaces.len());

    let selected = select_primary(&interfaces, profile);
    match &selected {
        Some(info) => info!("Using interface {info}"),
        None => debug!("No interface with an external IPv4 address"),
    }
    selected
}

/// Pure selection over an already enumerated interface list.
///
/// 1. Priority names from the profile, in profile order.
/// 2. Any interface in enumeration order that is not a virtual adapter.
///
/// With [`PlatformProfile::match_description`] set, a priority name may also
/// appear inside the adapter description, and the description is checked
/// against the virtual adapter list as well.
pub fn select_primary(
    interfaces: &[NetworkInterface],
    profile: &PlatformProfile,
) -> Option<NetworkInterfaceInfo> {
    let by_priority = profile.priority_interfaces.iter().find_map(|&name| {
        interfaces
            .iter()
            .filter(|interface| {
                interface.name == name
                    || (profile.match_description
                        && interface.description.contains(name)
                        && !is_virtual_adapter(interface, profile))
            })
            .find_map(external_ipv4)
    });

    by_priority.or_else(|| {
        interfaces
            .iter()
            .filter(|interface| !is_virtual_adapter(interface, profile))
            .find_map(external_ipv4)
    })
}

fn external_ipv4(interface: &NetworkInterface) -> Option<NetworkInterfaceInfo> {
    if interface.is_loopback() {
        return None;
    }

    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if !v4.ip().is_loopback() => Some(NetworkInterfaceInfo {
            address: v4.ip(),
            netmask: v4.mask(),
            name: interface.name.clone(),
        }),
        _ => None,
    })
}

fn is_virtual_adapter(interface: &NetworkInterface, profile: &PlatformProfile) -> bool {
    let matches = |text: &str| profile.virtual_adapters.iter().any(|fragment| text.contains(fragment));
    matches(&interface.name) || (profile.match_description && matches(&interface.description))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
