use std::{io, path::PathBuf, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum LookupError {
    // Configuration Errors
    #[error("No input sources given")]
    NoInputSources,
    #[error("No output destination given")]
    NoOutput,
    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,
    #[error("Consumer count {count} out of range ({min}..={max})")]
    ConsumerCountOutOfRange { count: usize, min: usize, max: usize },
    #[error("Invalid override '{0}' (expected host=ip)")]
    InvalidOverride(String),
    #[error("Failed to load config {}: {reason}", path.display())]
    ConfigFileFailed { path: PathBuf, reason: String },

    // Input Errors
    #[error("Failed to open input source {}: {source}", path.display())]
    SourceOpenFailed {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Failed to read input source {}: {source}", path.display())]
    SourceReadFailed {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    // Output Errors
    #[error("Failed to open output {}: {source}", path.display())]
    SinkOpenFailed {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Failed to write result record: {source}")]
    SinkWriteFailed {
        #[source]
        source: Arc<io::Error>,
    },

    // Resolution Errors
    #[error("Name not resolved: {domain}: {source}")]
    NameNotResolved {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("No addresses returned for {domain}")]
    NoAddresses { domain: String },
    #[error("Hostname of {length} bytes exceeds the {max} byte limit")]
    NameTooLong { length: usize, max: usize },

    // Lifecycle Errors
    #[error("Every consumer exited while work was still queued")]
    QueueDisconnected,
    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: String },
    #[error("Failed to spawn worker {worker}: {source}")]
    WorkerSpawnFailed {
        worker: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Failed to start resolver runtime: {source}")]
    RuntimeInit {
        #[source]
        source: Arc<io::Error>,
    },
}

impl LookupError {
    /// Build a `NameNotResolved` from any io error.
    pub fn dns_failed(domain: impl Into<String>, err: io::Error) -> Self {
        LookupError::NameNotResolved { domain: domain.into(), source: Arc::new(err) }
    }

    /// Process exit status reported by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            LookupError::NoInputSources
            | LookupError::NoOutput
            | LookupError::ZeroQueueCapacity
            | LookupError::ConsumerCountOutOfRange { .. }
            | LookupError::InvalidOverride(_)
            | LookupError::ConfigFileFailed { .. } => 2,
            LookupError::SourceOpenFailed { .. }
            | LookupError::SourceReadFailed { .. }
            | LookupError::SinkOpenFailed { .. }
            | LookupError::SinkWriteFailed { .. } => 3,
            LookupError::QueueDisconnected
            | LookupError::WorkerPanicked { .. }
            | LookupError::WorkerSpawnFailed { .. }
            | LookupError::RuntimeInit { .. } => 4,
            LookupError::NameNotResolved { .. }
            | LookupError::NoAddresses { .. }
            | LookupError::NameTooLong { .. } => 1,
        }
    }

    /// Whether the run recovers from this error locally (skip and continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LookupError::SourceOpenFailed { .. }
                | LookupError::SourceReadFailed { .. }
                | LookupError::NameNotResolved { .. }
                | LookupError::NoAddresses { .. }
                | LookupError::NameTooLong { .. }
        )
    }

    /// Whether this error was raised before any worker started.
    pub fn is_config_error(&self) -> bool {
        self.exit_code() == 2
    }
}
