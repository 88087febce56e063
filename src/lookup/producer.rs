//! The single producer: streams hostnames from the input sources into the
//! queue, then raises the completion flag.

use super::queue::{BoundedQueue, Disconnected};
use crate::base::{context::IoResultExt, lookuperror::LookupError};
use crate::dns::Name;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// What the producer did over the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Sources read to the end.
    pub sources_read: usize,
    /// Sources that failed to open or failed mid-read.
    pub sources_skipped: Vec<PathBuf>,
    /// Hostnames pushed onto the queue.
    pub names_enqueued: usize,
    /// Lines dropped because the hostname was over the length limit.
    pub names_rejected: usize,
    /// Set when the producer stopped early because no consumer was left.
    pub disconnected: bool,
}

/// Closes the queue when dropped, so the completion flag is raised on
/// every exit path, unwinding included.
struct CloseOnDrop<'a>(&'a BoundedQueue<Name>);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
        tracing::debug!("producer finished, queue closed");
    }
}

pub struct Producer<'a> {
    sources: &'a [PathBuf],
    queue: &'a BoundedQueue<Name>,
}

impl<'a> Producer<'a> {
    pub fn new(sources: &'a [PathBuf], queue: &'a BoundedQueue<Name>) -> Self {
        Self { sources, queue }
    }

    /// Reads every source in order and pushes each non-blank line.
    ///
    /// A source that cannot be opened or read is reported and skipped.
    pub fn run(self) -> ProducerReport {
        let _close = CloseOnDrop(self.queue);
        let mut report = ProducerReport::default();

        for path in self.sources {
            match self.feed_source(path, &mut report) {
                Ok(()) => report.sources_read += 1,
                Err(SourceStop::Failed(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping input source");
                    report.sources_skipped.push(path.clone());
                }
                Err(SourceStop::Disconnected) => {
                    tracing::warn!(
                        path = %path.display(),
                        "no consumer left, abandoning remaining input"
                    );
                    report.disconnected = true;
                    break;
                }
            }
        }

        report
    }

    fn feed_source(&self, path: &Path, report: &mut ProducerReport) -> Result<(), SourceStop> {
        let file = File::open(path).source_context(path)?;
        tracing::debug!(path = %path.display(), "reading input source");

        for line in BufReader::new(file).lines() {
            let line = line.read_context(path)?;
            let name = match Name::parse(&line) {
                Ok(Some(name)) => name,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "rejecting hostname");
                    report.names_rejected += 1;
                    continue;
                }
            };
            self.queue.push(name).map_err(|Disconnected(_)| SourceStop::Disconnected)?;
            report.names_enqueued += 1;
        }

        Ok(())
    }
}

enum SourceStop {
    Failed(LookupError),
    Disconnected,
}

impl From<LookupError> for SourceStop {
    fn from(e: LookupError) -> Self {
        SourceStop::Failed(e)
    }
}
