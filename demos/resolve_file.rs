//! Resolves one hostname file with a static override in front of the
//! system resolver, writing results next to the input.
//!
//! cargo run --example resolve_file -- names.txt results.txt

use multilookup::config::LookupConfig;
use multilookup::dns::{DnsResolverWithOverrides, GaiResolver};
use multilookup::lookup::Coordinator;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "names.txt".into());
    let output = args.next().unwrap_or_else(|| "results.txt".into());

    let overrides = DnsResolverWithOverrides::parse_overrides(["intranet.local=10.0.0.10"])?;
    let resolver = DnsResolverWithOverrides::new(Arc::new(GaiResolver::new()), overrides);

    let config = LookupConfig::new(vec![input.into()], output.clone()).with_consumers(4);
    let report = Coordinator::new(config, Arc::new(resolver)).run()?;

    println!("=== {} ===", output);
    println!("Resolved: {}", report.resolved());
    println!("Failed:   {}", report.failed());
    println!("Time:     {:?}", report.elapsed);

    Ok(())
}
