//! # multilookup
//!
//! Resolves large lists of hostnames with a bounded producer/consumer pool.
//!
//! One requester thread reads hostnames from a list of input files into a
//! fixed-capacity queue. A fixed pool of resolver threads drains the queue,
//! looks each name up and appends `hostname,address` to a shared output
//! file. Failed lookups are recorded with an empty address.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use multilookup::config::LookupConfig;
//! use multilookup::dns::GaiResolver;
//! use multilookup::lookup::Coordinator;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), multilookup::base::lookuperror::LookupError> {
//!     let config = LookupConfig::new(vec!["names1.txt".into()], "results.txt")
//!         .with_consumers(4);
//!     let report = Coordinator::new(config, Arc::new(GaiResolver::new())).run()?;
//!     println!("{} resolved, {} failed", report.resolved(), report.failed());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and IO error context helpers
//! - [`config`] - Startup configuration and validation
//! - [`dns`] - Resolver trait, system and hickory resolvers, overrides
//! - [`lookup`] - Bounded queue, producer, consumers, result sink, coordinator

pub mod base;
pub mod config;
pub mod dns;
pub mod lookup;
