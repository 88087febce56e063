//! Append-only destination for resolution records.

use crate::base::{context::IoResultExt, lookuperror::LookupError};
use crate::dns::Resolution;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Serializes `hostname,address` records from many consumers into one
/// writer. Each record is written and flushed under the sink's own lock,
/// so records never interleave and each is on disk before the next begins.
///
/// There is no buffering layer between the sink and the writer, so a record
/// whose append failed never reaches the destination afterwards.
pub struct ResultSink<W: Write> {
    writer: Mutex<W>,
    written: AtomicUsize,
}

impl ResultSink<File> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, LookupError> {
        let file = File::create(path).sink_context(path)?;
        tracing::debug!(path = %path.display(), "output truncated");
        Ok(Self::new(file))
    }
}

impl<W: Write> ResultSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer), written: AtomicUsize::new(0) }
    }

    /// Appends one record.
    pub fn append(&self, resolution: &Resolution) -> Result<(), LookupError> {
        let record = format!("{}\n", resolution);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(record.as_bytes()).write_context()?;
        writer.flush().write_context()?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of records successfully appended.
    pub fn records_written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> std::fmt::Debug for ResultSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSink").field("records_written", &self.records_written()).finish()
    }
}
