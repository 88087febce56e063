//! DNS resolver using hickory-dns.
//!
//! The hickory resolver is async. Lookup workers are plain threads, so this
//! wrapper owns a small multi-threaded tokio runtime and blocks the calling
//! worker on each lookup future. Any number of workers may block on the
//! runtime concurrently.

use super::{Addrs, Name, Resolve};
use crate::base::lookuperror::LookupError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Worker threads driving hickory's sockets. Lookups are IO bound.
const RUNTIME_WORKERS: usize = 2;

/// Blocking DNS resolver backed by hickory-dns.
///
/// # Example
///
/// ```rust,ignore
/// use multilookup::dns::{HickoryResolver, Name, Resolve};
///
/// let resolver = HickoryResolver::new()?;
/// let addrs = resolver.resolve(&Name::new("example.com"))?;
/// ```
#[derive(Clone)]
pub struct HickoryResolver {
    runtime: Arc<Runtime>,
    resolver: Arc<TokioResolver>,
}

impl HickoryResolver {
    /// Creates a new `HickoryResolver`.
    ///
    /// It will attempt to read system DNS configuration; if that fails,
    /// it falls back to sensible defaults.
    pub fn new() -> Result<Self, LookupError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKERS)
            .thread_name("hickory-dns")
            .enable_all()
            .build()
            .map_err(|e| LookupError::RuntimeInit { source: Arc::new(e) })?;

        let resolver = {
            let _guard = runtime.enter();
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
            builder.build()
        };

        Ok(Self { runtime: Arc::new(runtime), resolver: Arc::new(resolver) })
    }
}

impl std::fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryResolver").finish_non_exhaustive()
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: &Name) -> Result<Addrs, LookupError> {
        let domain = name.as_str();
        tracing::debug!(domain = %domain, "resolving via hickory-dns");

        let lookup = self.runtime.block_on(self.resolver.lookup_ip(domain)).map_err(|e| {
            tracing::debug!(domain = %domain, error = %e, "hickory-dns lookup failed");
            LookupError::dns_failed(
                domain,
                std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
            )
        })?;

        let addrs: Addrs = lookup.iter().collect();

        if addrs.is_empty() {
            return Err(LookupError::NoAddresses { domain: domain.to_string() });
        }

        tracing::debug!(domain = %domain, count = addrs.len(), "hickory-dns resolution complete");
        Ok(addrs)
    }
}
