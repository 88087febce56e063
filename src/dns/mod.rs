//! DNS Resolution Module
//!
//! Provides pluggable, blocking DNS resolution with support for:
//! - System resolver (getaddrinfo)
//! - hickory-dns resolver driven by a private tokio runtime
//! - Hostname-to-IP override mechanism
//!
//! # Architecture
//!
//! The `Resolve` trait is the only thing the lookup workers know about.
//! [`Resolution::lookup`] sits on top of it and turns every resolver failure
//! into an empty address, so a bad name never takes a worker down.
//!
//! # Example
//!
//! ```rust,ignore
//! use multilookup::dns::{AddressFamily, GaiResolver, Name, Resolution};
//!
//! let resolver = GaiResolver::new();
//! let res = Resolution::lookup(&resolver, Name::new("example.com"), AddressFamily::Ipv4);
//! println!("{}", res); // example.com,93.184.215.14
//! ```

mod gai;
mod hickory;
mod resolve;

pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use resolve::{
    AddressFamily, Addrs, DnsResolverWithOverrides, Name, Resolution, Resolve, MAX_NAME_LENGTH,
};
