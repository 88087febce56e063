//! `multi-lookup` command line front end.

use clap::{ArgAction, Parser, ValueEnum};
use multilookup::base::lookuperror::LookupError;
use multilookup::config::{LookupConfig, DEFAULT_CONSUMERS, MAX_CONSUMERS, MIN_CONSUMERS};
use multilookup::dns::{
    AddressFamily, DnsResolverWithOverrides, GaiResolver, HickoryResolver, Resolve,
};
use multilookup::lookup::{Coordinator, RunReport};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "multi-lookup", version, about = "Resolve hostnames from input files in parallel")]
struct Cli {
    /// Input files followed by the output file
    #[arg(value_name = "PATH", num_args = 2.., required = true)]
    paths: Vec<PathBuf>,

    /// Resolver threads to run
    #[arg(short = 'c', long = "consumers", value_parser = parse_consumers)]
    consumers: Option<usize>,

    /// Queue slots between the requester and the resolvers
    #[arg(short = 'q', long = "queue-capacity")]
    queue_capacity: Option<usize>,

    /// Address family to report
    #[arg(long = "family", value_enum)]
    family: Option<FamilyArg>,

    /// Name resolution backend
    #[arg(long = "resolver", value_enum, default_value_t = ResolverKind::System)]
    resolver: ResolverKind,

    /// Static answer, host=ip (repeatable)
    #[arg(long = "override", value_name = "HOST=IP")]
    overrides: Vec<String>,

    /// JSON configuration file; flags override its values
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolverKind {
    /// getaddrinfo
    System,
    /// hickory-dns
    Hickory,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FamilyArg {
    Ipv4,
    Ipv6,
    Any,
}

impl From<FamilyArg> for AddressFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Ipv4 => AddressFamily::Ipv4,
            FamilyArg::Ipv6 => AddressFamily::Ipv6,
            FamilyArg::Any => AddressFamily::Any,
        }
    }
}

fn parse_consumers(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if (MIN_CONSUMERS..=MAX_CONSUMERS).contains(&n) {
        Ok(n)
    } else {
        Err(format!(
            "must be between {MIN_CONSUMERS} and {MAX_CONSUMERS} (default {DEFAULT_CONSUMERS})"
        ))
    }
}

impl Cli {
    fn into_config(self) -> Result<(LookupConfig, ResolverKind, Vec<String>), LookupError> {
        let mut paths = self.paths;
        // clap guarantees at least two paths
        let output = paths.pop().ok_or(LookupError::NoInputSources)?;

        let mut config = match &self.config {
            Some(path) => {
                let mut config = LookupConfig::from_json_file(path)?;
                config.inputs = paths;
                config.output = output;
                config
            }
            None => LookupConfig::new(paths, output),
        };
        if let Some(consumers) = self.consumers {
            config = config.with_consumers(consumers);
        }
        if let Some(capacity) = self.queue_capacity {
            config = config.with_queue_capacity(capacity);
        }
        if let Some(family) = self.family {
            config = config.with_address_family(family.into());
        }
        Ok((config, self.resolver, self.overrides))
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn build_resolver(
    kind: ResolverKind,
    overrides: &[String],
) -> Result<Arc<dyn Resolve>, LookupError> {
    let base: Arc<dyn Resolve> = match kind {
        ResolverKind::System => Arc::new(GaiResolver::new()),
        ResolverKind::Hickory => Arc::new(HickoryResolver::new()?),
    };
    if overrides.is_empty() {
        return Ok(base);
    }
    let map = DnsResolverWithOverrides::parse_overrides(overrides.iter().map(String::as_str))?;
    Ok(Arc::new(DnsResolverWithOverrides::new(base, map)))
}

fn run(cli: Cli) -> Result<RunReport, LookupError> {
    let (config, kind, overrides) = cli.into_config()?;
    config.validate()?;
    let resolver = build_resolver(kind, &overrides)?;
    Coordinator::new(config, resolver).run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match run(cli) {
        Ok(report) => {
            info!(records = report.records_written, "results written");
            println!(
                "{} names, {} resolved, {} failed, {} sources skipped in {:.3}s",
                report.producer.names_enqueued,
                report.resolved(),
                report.failed(),
                report.producer.sources_skipped.len(),
                report.elapsed.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "lookup run failed");
            ExitCode::from(e.exit_code())
        }
    }
}
