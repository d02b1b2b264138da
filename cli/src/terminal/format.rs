use colored::*;
use lanseek_common::config::PlatformProfile;
use lanseek_common::network::interface::NetworkInterfaceInfo;
use lanseek_common::network::subnet::{HOST_OCTETS, SubnetPrefix};
use lanseek_core::{DiscoveredService, ServiceStatus};
use lanseek_protocols::http::ServiceKind;

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn service_to_details(service: &DiscoveredService) -> Vec<Detail> {
    vec![
        ("URL".to_string(), service.url.color(colors::URL).bold()),
        ("Host".to_string(), service.host.color(colors::IPV4_ADDR)),
        ("Port".to_string(), service.port.to_string().normal()),
    ]
}

pub fn status_to_details(status: &ServiceStatus, port: u16) -> Vec<Detail> {
    match status {
        ServiceStatus::Unreachable => {
            vec![("Status".to_string(), "offline".color(colors::OFFLINE).bold())]
        }
        ServiceStatus::Reachable { metadata: None } => vec![
            ("Status".to_string(), "online".color(colors::ONLINE).bold()),
            ("Title".to_string(), format!("Service on port {port}").normal()),
            ("HTTP".to_string(), "no response".dimmed()),
        ],
        ServiceStatus::Reachable {
            metadata: Some(metadata),
        } => {
            let kind = match metadata.kind {
                ServiceKind::WebPage => "web page",
                ServiceKind::Http => "http",
            };
            let mut details = vec![
                ("Status".to_string(), "online".color(colors::ONLINE).bold()),
                ("Title".to_string(), metadata.display_title(port).normal()),
                ("HTTP".to_string(), format!("{} ({kind})", metadata.status).normal()),
            ];
            if let Some(server) = &metadata.server {
                details.push(("Server".to_string(), server.normal()));
            }
            details
        }
    }
}

pub fn interface_to_details(interface: &NetworkInterfaceInfo) -> Vec<Detail> {
    let prefix = SubnetPrefix::from_masked(interface.address, interface.netmask);
    let first = prefix.host(*HOST_OCTETS.start());
    let last = prefix.host(*HOST_OCTETS.end());

    vec![
        ("Name".to_string(), interface.name.color(colors::PRIMARY)),
        ("IPv4".to_string(), interface.address.to_string().color(colors::IPV4_ADDR)),
        ("Netmask".to_string(), interface.netmask.to_string().normal()),
        ("Sweep".to_string(), format!("{first} - {last}").normal()),
    ]
}

pub fn profile_to_details(profile: &PlatformProfile) -> Vec<Detail> {
    vec![
        ("Platform".to_string(), format!("{:?}", profile.platform).normal()),
        (
            "Timeout".to_string(),
            format!("{}ms", profile.probe_timeout.as_millis()).normal(),
        ),
        ("Batch".to_string(), profile.batch_width.to_string().normal()),
        (
            "Priority".to_string(),
            profile.priority_interfaces.join(", ").normal(),
        ),
    ]
}
