//! /24 style network prefixes.
//!
//! The fourth octet is the host variable of a sweep, so only the first three
//! octets of `address & netmask` are kept.

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Host octets probed in a sweep, network and broadcast addresses excluded.
pub const HOST_OCTETS: RangeInclusive<u8> = 1..=254;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetPrefix([u8; 3]);

impl SubnetPrefix {
    pub fn from_masked(address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        let address = address.octets();
        let netmask = netmask.octets();
        Self([
            address[0] & netmask[0],
            address[1] & netmask[1],
            address[2] & netmask[2],
        ])
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    pub fn host(&self, octet: u8) -> Ipv4Addr {
        let [a, b, c] = self.0;
        Ipv4Addr::new(a, b, c, octet)
    }

    /// Every candidate host of this prefix, lowest host octet first.
    pub fn hosts(&self) -> Vec<String> {
        HOST_OCTETS.map(|octet| self.host(octet).to_string()).collect()
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}")
    }
}

/// Applies `netmask` to `address`, both given in dotted decimal form.
pub fn compute_subnet_prefix(address: &str, netmask: &str) -> Result<SubnetPrefix, SubnetError> {
    Ok(SubnetPrefix::from_masked(parse_ipv4(address)?, parse_ipv4(netmask)?))
}

fn parse_ipv4(s: &str) -> Result<Ipv4Addr, SubnetError> {
    s.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| SubnetError::InvalidAddress(s.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
