//! Target expansion for netsweep
//!
//! Expands sweep targets (CIDR networks, IP ranges, hostnames) into the
//! individual addresses to probe. Expansion is deterministic: the result is
//! sorted and deduplicated.

use crate::error::{Error, ParseError, Result};
use crate::types::{IpAddr, Target};

use std::net::Ipv4Addr;
use tracing::{debug, warn};

/// Expand a list of targets into individual IP addresses
///
/// Hostnames are resolved through the system resolver; a hostname that does
/// not resolve is skipped with a warning rather than failing the sweep.
/// The expansion is capped at `max_hosts` addresses.
pub async fn expand_targets(targets: &[Target], max_hosts: usize) -> Result<Vec<IpAddr>> {
    let mut ips = Vec::new();

    for target in targets {
        match target {
            Target::Ip(ip) => ips.push(*ip),
            Target::Cidr { network, prefix } => {
                ips.extend(expand_cidr(*network, *prefix, max_hosts)?);
            }
            Target::Range { start, end } => {
                ips.extend(expand_range(*start, *end, max_hosts)?);
            }
            Target::Hostname(hostname) => match resolve_hostname(hostname).await {
                Ok(resolved) => ips.extend(resolved),
                Err(e) => warn!("Skipping unresolvable hostname {}: {}", hostname, e),
            },
        }

        if ips.len() > max_hosts {
            return Err(Error::parse(ParseError::InvalidTarget {
                target: format!("expansion exceeds {} hosts", max_hosts),
            }));
        }
    }

    ips.sort();
    ips.dedup();

    debug!("Expanded {} targets to {} addresses", targets.len(), ips.len());
    Ok(ips)
}

/// Expand CIDR notation to individual addresses
pub fn expand_cidr(network: IpAddr, prefix: u8, max_hosts: usize) -> Result<Vec<IpAddr>> {
    match network {
        IpAddr::V4(ipv4) => expand_ipv4_cidr(ipv4, prefix, max_hosts),
        IpAddr::V6(ipv6) => {
            if prefix > 128 {
                return Err(Error::parse(ParseError::InvalidCidr {
                    cidr: format!("{}/{}", network, prefix),
                }));
            }
            // Anything below /120 expands to more addresses than a sweep
            // can reasonably probe.
            if prefix < 120 {
                return Err(Error::parse(ParseError::InvalidCidr {
                    cidr: format!("IPv6 prefix too short for expansion: /{}", prefix),
                }));
            }

            let host_bits = 128 - prefix as u32;
            let count = 1u128 << host_bits;
            let base = u128::from(ipv6) & !(count - 1);

            let mut ips = Vec::with_capacity(count as usize);
            for i in 0..count {
                ips.push(IpAddr::V6((base + i).into()));
            }
            Ok(ips)
        }
    }
}

/// Expand IPv4 CIDR to individual host addresses
///
/// Host bits in the input are masked off. For prefixes shorter than /31 the
/// network and broadcast addresses are excluded; /31 yields both addresses
/// and /32 the single address.
pub fn expand_ipv4_cidr(base: Ipv4Addr, prefix: u8, max_hosts: usize) -> Result<Vec<IpAddr>> {
    if prefix > 32 {
        return Err(Error::parse(ParseError::InvalidCidr {
            cidr: format!("{}/{}", base, prefix),
        }));
    }

    let base_num = u32::from(base);

    if prefix == 32 {
        return Ok(vec![IpAddr::V4(base)]);
    }

    let host_bits = 32 - prefix as u32;
    let num_addrs = 1u64 << host_bits;
    let network_addr = (base_num as u64 & !(num_addrs - 1)) as u32;

    if prefix == 31 {
        return Ok(vec![
            IpAddr::V4(Ipv4Addr::from(network_addr)),
            IpAddr::V4(Ipv4Addr::from(network_addr + 1)),
        ]);
    }

    if num_addrs - 2 > max_hosts as u64 {
        return Err(Error::parse(ParseError::InvalidCidr {
            cidr: format!("{}/{} expands to too many hosts", base, prefix),
        }));
    }

    // Skip network and broadcast addresses
    let mut ips = Vec::with_capacity((num_addrs - 2) as usize);
    for i in 1..(num_addrs - 1) {
        ips.push(IpAddr::V4(Ipv4Addr::from(network_addr + i as u32)));
    }

    Ok(ips)
}

/// Expand an inclusive IP range to individual addresses
pub fn expand_range(start: IpAddr, end: IpAddr, max_hosts: usize) -> Result<Vec<IpAddr>> {
    match (start, end) {
        (IpAddr::V4(start_v4), IpAddr::V4(end_v4)) => {
            let start_num = u32::from(start_v4);
            let end_num = u32::from(end_v4);

            if end_num < start_num {
                return Err(Error::parse(ParseError::InvalidRange {
                    range: format!("{}-{}: end must not precede start", start, end),
                }));
            }

            let size = (end_num - start_num) as u64 + 1;
            if size > max_hosts as u64 {
                return Err(Error::parse(ParseError::InvalidRange {
                    range: format!("{}-{} expands to too many hosts", start, end),
                }));
            }

            let mut ips = Vec::with_capacity(size as usize);
            for ip_num in start_num..=end_num {
                ips.push(IpAddr::V4(Ipv4Addr::from(ip_num)));
            }
            Ok(ips)
        }
        (IpAddr::V6(start_v6), IpAddr::V6(end_v6)) => {
            let start_num = u128::from(start_v6);
            let end_num = u128::from(end_v6);

            if end_num < start_num {
                return Err(Error::parse(ParseError::InvalidRange {
                    range: format!("{}-{}: end must not precede start", start, end),
                }));
            }

            let size = end_num - start_num + 1;
            if size > max_hosts as u128 {
                return Err(Error::parse(ParseError::InvalidRange {
                    range: format!("{}-{} expands to too many hosts", start, end),
                }));
            }

            let mut ips = Vec::with_capacity(size as usize);
            for ip_num in start_num..=end_num {
                ips.push(IpAddr::V6(ip_num.into()));
            }
            Ok(ips)
        }
        _ => Err(Error::parse(ParseError::InvalidRange {
            range: "IP range must use a single IP version".to_string(),
        })),
    }
}

/// Resolve a hostname to its IP addresses through the system resolver
pub async fn resolve_hostname(hostname: &str) -> Result<Vec<IpAddr>> {
    let addrs = tokio::net::lookup_host((hostname, 0)).await.map_err(|_| {
        Error::parse(ParseError::InvalidHostname {
            hostname: hostname.to_string(),
        })
    })?;

    Ok(addrs.map(|sa| IpAddr::from(sa.ip())).collect())
}
