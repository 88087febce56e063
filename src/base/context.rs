//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into context-rich `LookupError` variants.

use crate::base::lookuperror::LookupError;
use std::{io, path::Path, sync::Arc};

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add input-source context to an IO error raised while opening.
    ///
    /// # Example
    /// ```ignore
    /// use multilookup::base::context::IoResultExt;
    ///
    /// let file = File::open(&path).source_context(&path)?;
    /// // Error: "Failed to open input source names.txt: No such file or directory"
    /// ```
    fn source_context(self, path: &Path) -> Result<T, LookupError>;

    /// Add input-source context to an IO error raised mid-read.
    fn read_context(self, path: &Path) -> Result<T, LookupError>;

    /// Add output context to an IO error raised while opening the sink.
    fn sink_context(self, path: &Path) -> Result<T, LookupError>;

    /// Mark an IO error as a failed result-record write.
    fn write_context(self) -> Result<T, LookupError>;

    /// Add DNS resolution context to an IO error.
    fn dns_context(self, domain: &str) -> Result<T, LookupError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn source_context(self, path: &Path) -> Result<T, LookupError> {
        self.map_err(|e| LookupError::SourceOpenFailed {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })
    }

    fn read_context(self, path: &Path) -> Result<T, LookupError> {
        self.map_err(|e| LookupError::SourceReadFailed {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })
    }

    fn sink_context(self, path: &Path) -> Result<T, LookupError> {
        self.map_err(|e| LookupError::SinkOpenFailed {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })
    }

    fn write_context(self) -> Result<T, LookupError> {
        self.map_err(|e| LookupError::SinkWriteFailed { source: Arc::new(e) })
    }

    fn dns_context(self, domain: &str) -> Result<T, LookupError> {
        self.map_err(|e| LookupError::dns_failed(domain, e))
    }
}
