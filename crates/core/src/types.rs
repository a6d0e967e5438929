//! Core types and data structures for netsweep

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr as StdIpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// IP address type that supports both IPv4 and IPv6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IpAddr {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl From<StdIpAddr> for IpAddr {
    fn from(addr: StdIpAddr) -> Self {
        match addr {
            StdIpAddr::V4(v4) => IpAddr::V4(v4),
            StdIpAddr::V6(v6) => IpAddr::V6(v6),
        }
    }
}

impl From<IpAddr> for StdIpAddr {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => StdIpAddr::V4(v4),
            IpAddr::V6(v6) => StdIpAddr::V6(v6),
        }
    }
}

impl From<Ipv4Addr> for IpAddr {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddr::V4(addr)
    }
}

impl From<Ipv6Addr> for IpAddr {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddr::V6(addr)
    }
}

impl fmt::Display for IpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddr::V4(v4) => write!(f, "{}", v4),
            IpAddr::V6(v6) => write!(f, "{}", v6),
        }
    }
}

impl FromStr for IpAddr {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<StdIpAddr>().map(Into::into)
    }
}

impl IpAddr {
    /// Returns true if this is an IPv4 address
    pub fn is_ipv4(&self) -> bool {
        matches!(self, IpAddr::V4(_))
    }

    /// Returns true if this is an IPv6 address
    pub fn is_ipv6(&self) -> bool {
        matches!(self, IpAddr::V6(_))
    }

    /// Returns true if this is a loopback address
    pub fn is_loopback(&self) -> bool {
        match self {
            IpAddr::V4(ip) => ip.is_loopback(),
            IpAddr::V6(ip) => ip.is_loopback(),
        }
    }

    /// Returns true if this is a private address
    pub fn is_private(&self) -> bool {
        match self {
            IpAddr::V4(ip) => ip.is_private(),
            IpAddr::V6(ip) => {
                // Unique local addresses (RFC 4193)
                ip.segments()[0] & 0xfe00 == 0xfc00
            }
        }
    }
}

/// Sweep target specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Single IP address
    Ip(IpAddr),
    /// CIDR network range
    Cidr { network: IpAddr, prefix: u8 },
    /// Inclusive IP range
    Range { start: IpAddr, end: IpAddr },
    /// Hostname to resolve
    Hostname(String),
}

impl Target {
    /// Create a target from a single IP
    pub fn ip(addr: IpAddr) -> Self {
        Target::Ip(addr)
    }

    /// Create a target from CIDR notation
    pub fn cidr(network: IpAddr, prefix: u8) -> Self {
        Target::Cidr { network, prefix }
    }

    /// Create a target from an IP range
    pub fn range(start: IpAddr, end: IpAddr) -> Self {
        Target::Range { start, end }
    }

    /// Create a target from a hostname
    pub fn hostname<S: Into<String>>(hostname: S) -> Self {
        Target::Hostname(hostname.into())
    }

    /// Estimate the number of probeable hosts in this target
    ///
    /// For IPv4 CIDR targets this follows the enumeration rules: network and
    /// broadcast addresses are excluded for prefixes shorter than /31.
    pub fn host_count(&self) -> u64 {
        match self {
            Target::Ip(_) => 1,
            Target::Hostname(_) => 1,
            Target::Cidr { network, prefix } => match network {
                IpAddr::V4(_) => match *prefix {
                    32.. => 1,
                    31 => 2,
                    p => 2u64.pow(32 - p as u32) - 2,
                },
                IpAddr::V6(_) => {
                    if *prefix >= 128 {
                        1
                    } else {
                        std::cmp::min(2u64.pow(16), 2u64.saturating_pow(128 - *prefix as u32))
                    }
                }
            },
            Target::Range { start, end } => match (start, end) {
                (IpAddr::V4(s), IpAddr::V4(e)) => {
                    let start_int = u32::from(*s);
                    let end_int = u32::from(*e);
                    if end_int >= start_int {
                        (end_int - start_int + 1) as u64
                    } else {
                        0
                    }
                }
                _ => 1,
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Ip(ip) => write!(f, "{}", ip),
            Target::Cidr { network, prefix } => write!(f, "{}/{}", network, prefix),
            Target::Range { start, end } => write!(f, "{}-{}", start, end),
            Target::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

impl FromStr for Target {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Try CIDR notation first
        if let Some((network_str, prefix_str)) = s.split_once('/') {
            let network: IpAddr = network_str.parse().map_err(|_| {
                crate::Error::parse(crate::error::ParseError::InvalidTarget {
                    target: s.to_string(),
                })
            })?;
            let prefix: u8 = prefix_str.parse().map_err(|_| {
                crate::Error::parse(crate::error::ParseError::InvalidTarget {
                    target: s.to_string(),
                })
            })?;
            let max_prefix = if network.is_ipv4() { 32 } else { 128 };
            if prefix > max_prefix {
                return Err(crate::Error::parse(crate::error::ParseError::InvalidCidr {
                    cidr: s.to_string(),
                }));
            }
            return Ok(Target::cidr(network, prefix));
        }

        // Try IP range notation
        if let Some((start_str, end_str)) = s.split_once('-') {
            if let (Ok(start), Ok(end)) = (start_str.parse::<IpAddr>(), end_str.parse::<IpAddr>()) {
                return Ok(Target::range(start, end));
            }
        }

        // Try single IP
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Target::ip(ip));
        }

        // Assume hostname
        Ok(Target::hostname(s))
    }
}

/// Host state after probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Up,
    Down,
    Unknown,
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostState::Up => write!(f, "up"),
            HostState::Down => write!(f, "down"),
            HostState::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_addr_conversion() {
        let ipv4 = "192.168.1.1".parse::<IpAddr>().unwrap();
        let ipv6 = "::1".parse::<IpAddr>().unwrap();

        assert!(ipv4.is_ipv4());
        assert!(ipv6.is_ipv6());
        assert!(ipv6.is_loopback());

        let roundtrip: StdIpAddr = ipv4.into();
        assert_eq!(IpAddr::from(roundtrip), ipv4);
    }

    #[test]
    fn test_ip_addr_properties() {
        let private = "10.1.2.3".parse::<IpAddr>().unwrap();
        assert!(private.is_private());

        let public = "8.8.8.8".parse::<IpAddr>().unwrap();
        assert!(!public.is_private());
        assert!(!public.is_loopback());
    }

    #[test]
    fn test_target_parsing() {
        let ip_target: Target = "192.168.1.1".parse().unwrap();
        assert!(matches!(ip_target, Target::Ip(_)));

        let cidr_target: Target = "192.168.1.0/24".parse().unwrap();
        assert!(matches!(cidr_target, Target::Cidr { prefix: 24, .. }));

        let range_target: Target = "192.168.1.1-192.168.1.20".parse().unwrap();
        assert!(matches!(range_target, Target::Range { .. }));

        let hostname_target: Target = "example.com".parse().unwrap();
        assert!(matches!(hostname_target, Target::Hostname(_)));

        assert!("300.0.0.1/24".parse::<Target>().is_err());
        assert!("192.168.1.0/abc".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_rejects_out_of_range_prefix() {
        assert!("10.0.0.0/99".parse::<Target>().is_err());
        assert!("10.0.0.0/33".parse::<Target>().is_err());
        assert!("2001:db8::/129".parse::<Target>().is_err());

        // Boundary prefixes are valid
        assert!("10.0.0.0/32".parse::<Target>().is_ok());
        assert!("2001:db8::/128".parse::<Target>().is_ok());
    }

    #[test]
    fn test_target_display_roundtrip() {
        for s in ["192.168.1.1", "192.168.1.0/24", "10.0.0.1-10.0.0.9", "router.local"] {
            let target: Target = s.parse().unwrap();
            assert_eq!(target.to_string(), s);
        }
    }

    #[test]
    fn test_target_host_count() {
        let single = Target::ip("192.168.1.1".parse().unwrap());
        assert_eq!(single.host_count(), 1);

        let cidr = Target::cidr("192.168.1.0".parse().unwrap(), 24);
        assert_eq!(cidr.host_count(), 254);

        let point_to_point = Target::cidr("192.168.1.0".parse().unwrap(), 31);
        assert_eq!(point_to_point.host_count(), 2);

        let host_route = Target::cidr("192.168.1.7".parse().unwrap(), 32);
        assert_eq!(host_route.host_count(), 1);

        let range = Target::range(
            "10.0.0.1".parse().unwrap(),
            "10.0.0.10".parse().unwrap(),
        );
        assert_eq!(range.host_count(), 10);
    }

    #[test]
    fn test_host_state_display() {
        assert_eq!(HostState::Up.to_string(), "up");
        assert_eq!(HostState::Down.to_string(), "down");
        assert_eq!(HostState::Unknown.to_string(), "unknown");
    }
}
