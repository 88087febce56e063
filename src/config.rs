//! Startup configuration for a lookup run.
//!
//! Values are fixed once the run starts. They come from a JSON file, from
//! command-line flags, or from the builder methods below.

use crate::base::lookuperror::LookupError;
use crate::dns::AddressFamily;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Queue slots between the producer and the consumers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
/// Consumers started when nothing else is configured.
pub const DEFAULT_CONSUMERS: usize = 10;
pub const MIN_CONSUMERS: usize = 1;
pub const MAX_CONSUMERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LookupConfig {
    /// Input sources, read in this order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Result destination, truncated when the run starts.
    #[serde(default)]
    pub output: PathBuf,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_consumers")]
    pub consumers: usize,
    #[serde(default)]
    pub address_family: AddressFamily,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_consumers() -> usize {
    DEFAULT_CONSUMERS
}

impl LookupConfig {
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            consumers: DEFAULT_CONSUMERS,
            address_family: AddressFamily::default(),
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_address_family(mut self, family: AddressFamily) -> Self {
        self.address_family = family;
        self
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, LookupError> {
        let fail = |reason: String| LookupError::ConfigFileFailed {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| fail(e.to_string()))
    }

    /// Rejects configurations that could never complete a run.
    ///
    /// Zero consumers would leave a full queue undrained forever, so the
    /// range check runs before any worker is started.
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.inputs.is_empty() {
            return Err(LookupError::NoInputSources);
        }
        if self.output.as_os_str().is_empty() {
            return Err(LookupError::NoOutput);
        }
        if self.queue_capacity == 0 {
            return Err(LookupError::ZeroQueueCapacity);
        }
        if !(MIN_CONSUMERS..=MAX_CONSUMERS).contains(&self.consumers) {
            return Err(LookupError::ConsumerCountOutOfRange {
                count: self.consumers,
                min: MIN_CONSUMERS,
                max: MAX_CONSUMERS,
            });
        }
        Ok(())
    }
}
