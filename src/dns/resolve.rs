//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that form
//! the boundary between the lookup workers and whatever actually answers
//! name queries.

use crate::base::lookuperror::LookupError;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    net::IpAddr,
    sync::Arc,
};

/// Longest hostname accepted from an input source, in bytes.
pub const MAX_NAME_LENGTH: usize = 1024;

/// A domain name to resolve into IP addresses.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to resolvers.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// Parses one line of an input source.
    ///
    /// Surrounding whitespace is trimmed. A blank line yields `Ok(None)`;
    /// a name over [`MAX_NAME_LENGTH`] bytes is rejected.
    pub fn parse(line: &str) -> Result<Option<Self>, LookupError> {
        let host = line.trim();
        if host.is_empty() {
            return Ok(None);
        }
        if host.len() > MAX_NAME_LENGTH {
            return Err(LookupError::NameTooLong { length: host.len(), max: MAX_NAME_LENGTH });
        }
        Ok(Some(Name::new(host)))
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Addresses returned by a resolver, in the order the resolver produced them.
pub type Addrs = Vec<IpAddr>;

/// Trait for DNS resolution.
///
/// Implementations block the calling thread for the duration of the lookup
/// and must be safe to call from many worker threads at once.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IP addresses.
    fn resolve(&self, name: &Name) -> Result<Addrs, LookupError>;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: &Name) -> Result<Addrs, LookupError> {
        (**self).resolve(name)
    }
}

/// Which address to report when a name has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// First IPv4 address.
    #[default]
    Ipv4,
    /// First IPv6 address.
    Ipv6,
    /// First address of either family.
    Any,
}

impl AddressFamily {
    /// Picks the reported address out of a resolver answer.
    pub fn select(self, addrs: &[IpAddr]) -> Option<IpAddr> {
        match self {
            AddressFamily::Ipv4 => addrs.iter().copied().find(IpAddr::is_ipv4),
            AddressFamily::Ipv6 => addrs.iter().copied().find(IpAddr::is_ipv6),
            AddressFamily::Any => addrs.first().copied(),
        }
    }
}

/// The outcome of looking up one hostname: the name plus the reported
/// address, or `None` when the lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: Name,
    pub address: Option<IpAddr>,
}

impl Resolution {
    /// Looks `name` up and folds every failure into an empty address.
    ///
    /// Resolver errors never escape this call; they are logged and the
    /// result is recorded with no address.
    pub fn lookup(resolver: &dyn Resolve, name: Name, family: AddressFamily) -> Self {
        let address = match resolver.resolve(&name) {
            Ok(addrs) => {
                let selected = family.select(&addrs);
                if selected.is_none() {
                    tracing::debug!(
                        domain = %name,
                        count = addrs.len(),
                        family = ?family,
                        "no address of the requested family"
                    );
                }
                selected
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(domain = %name, error = %e, "dnslookup error");
                None
            }
            Err(e) => {
                // Still recorded with an empty address; the resolver itself
                // is in trouble, not the name.
                tracing::error!(domain = %name, error = %e, "resolver failure");
                None
            }
        };
        Self { name, address }
    }

    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}

/// Formats as one output record, `hostname,address`, with an empty
/// address on failure.
impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{},{}", self.name, addr),
            None => write!(f, "{},", self.name),
        }
    }
}

/// DNS resolver wrapper that supports hostname overrides.
///
/// This resolver first checks a map of hostname-to-address overrides before
/// falling back to the underlying resolver. Useful for:
/// - Testing without real DNS
/// - Forcing specific IPs for certain domains
///
/// # Example
///
/// ```rust,ignore
/// use multilookup::dns::{DnsResolverWithOverrides, GaiResolver};
/// use std::collections::HashMap;
///
/// let mut overrides = HashMap::new();
/// overrides.insert("api.local".into(), vec!["127.0.0.1".parse().unwrap()]);
///
/// let resolver = DnsResolverWithOverrides::new(Arc::new(GaiResolver::new()), overrides);
/// ```
pub struct DnsResolverWithOverrides {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<Cow<'static, str>, Addrs>>,
}

impl DnsResolverWithOverrides {
    /// Creates a new resolver with the given overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback resolver for non-overridden hostnames.
    /// * `overrides` - Map of hostnames to their resolved addresses.
    pub fn new(inner: Arc<dyn Resolve>, overrides: HashMap<Cow<'static, str>, Addrs>) -> Self {
        Self { inner, overrides: Arc::new(overrides) }
    }

    /// Parses `host=ip` pairs into an override map.
    ///
    /// Repeating a host appends another address for it.
    pub fn parse_overrides<'a, I>(specs: I) -> Result<HashMap<Cow<'static, str>, Addrs>, LookupError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut overrides: HashMap<Cow<'static, str>, Addrs> = HashMap::new();
        for spec in specs {
            let (host, ip) = spec
                .split_once('=')
                .ok_or_else(|| LookupError::InvalidOverride(spec.to_string()))?;
            let host = host.trim();
            let ip: IpAddr =
                ip.trim().parse().map_err(|_| LookupError::InvalidOverride(spec.to_string()))?;
            if host.is_empty() {
                return Err(LookupError::InvalidOverride(spec.to_string()));
            }
            overrides.entry(Cow::Owned(host.to_string())).or_default().push(ip);
        }
        Ok(overrides)
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Resolve for DnsResolverWithOverrides {
    fn resolve(&self, name: &Name) -> Result<Addrs, LookupError> {
        // Check overrides first
        if let Some(addrs) = self.overrides.get(name.as_str()) {
            tracing::trace!(domain = %name, "resolved from override");
            return Ok(addrs.clone());
        }
        self.inner.resolve(name)
    }
}

impl fmt::Debug for DnsResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
