//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native DNS resolution via
//! `getaddrinfo`, called directly on the worker thread.
//!
//! # When to Use
//!
//! - When you need to respect system DNS configuration (/etc/resolv.conf, /etc/hosts)
//! - When DoH/DoT is not required
//! - As the default; the hickory resolver is opt-in

use super::{Addrs, Name, Resolve};
use crate::base::{context::IoResultExt, lookuperror::LookupError};
use std::net::{IpAddr, ToSocketAddrs};

/// System DNS resolver using `getaddrinfo`.
///
/// Each call blocks the calling worker for one name-service round trip.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: &Name) -> Result<Addrs, LookupError> {
        let host = name.as_str();

        // IP literals need no lookup
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        tracing::debug!(host = %host, "resolving via getaddrinfo");
        let addrs: Addrs = (host, 0u16)
            .to_socket_addrs()
            .dns_context(host)?
            .map(|addr| addr.ip())
            .collect();

        if addrs.is_empty() {
            return Err(LookupError::NoAddresses { domain: host.to_string() });
        }

        tracing::debug!(domain = %host, count = addrs.len(), "DNS resolution complete");
        Ok(addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_gai_resolver_ip_literal() {
        let resolver = GaiResolver::new();
        let addrs = resolver.resolve(&Name::new("127.0.0.1")).unwrap();
        assert_eq!(addrs, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[test]
    fn test_gai_resolver_localhost() {
        let resolver = GaiResolver::new();
        let result = resolver.resolve(&Name::new("localhost"));

        // localhost should always resolve
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }

    #[test]
    fn test_gai_resolver_invalid_tld() {
        let resolver = GaiResolver::new();
        let result = resolver.resolve(&Name::new("no-such-host.invalid"));

        match result {
            Err(LookupError::NameNotResolved { domain, .. }) => {
                assert_eq!(domain, "no-such-host.invalid");
            }
            Err(LookupError::NoAddresses { domain }) => {
                assert_eq!(domain, "no-such-host.invalid");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
