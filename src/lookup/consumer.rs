//! Pool members: pop a hostname, resolve it, append the record.

use super::queue::ConsumerGuard;
use super::SharedContext;
use crate::base::lookuperror::LookupError;
use crate::dns::{Name, Resolution};
use std::io::Write;

/// Per-consumer tally, returned when the consumer terminates normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    pub id: usize,
    /// Lookups that produced an address.
    pub resolved: usize,
    /// Lookups recorded with an empty address.
    pub failed: usize,
}

impl ConsumerReport {
    pub fn processed(&self) -> usize {
        self.resolved + self.failed
    }
}

pub struct Consumer<'a, W: Write> {
    id: usize,
    ctx: &'a SharedContext<'a, W>,
    _attached: ConsumerGuard<'a, Name>,
}

impl<'a, W: Write> Consumer<'a, W> {
    /// `attached` must come from `ctx.queue`; it is released when the
    /// consumer returns, whichever way it returns.
    pub fn new(id: usize, ctx: &'a SharedContext<'a, W>, attached: ConsumerGuard<'a, Name>) -> Self {
        Self { id, ctx, _attached: attached }
    }

    /// Runs until the queue is drained and closed.
    ///
    /// Resolution failures are recorded and never end the loop; a failed
    /// write to the sink does.
    pub fn run(self) -> Result<ConsumerReport, LookupError> {
        let mut report = ConsumerReport { id: self.id, ..Default::default() };
        tracing::debug!(consumer = self.id, "consumer started");

        while let Some(name) = self.ctx.queue.pop() {
            let resolution = Resolution::lookup(self.ctx.resolver, name, self.ctx.family);
            if resolution.is_resolved() {
                report.resolved += 1;
            } else {
                report.failed += 1;
            }

            if let Err(e) = self.ctx.sink.append(&resolution) {
                tracing::warn!(
                    consumer = self.id,
                    domain = %resolution.name,
                    error = %e,
                    "consumer stopping on write failure"
                );
                return Err(e);
            }
        }

        tracing::debug!(
            consumer = self.id,
            resolved = report.resolved,
            failed = report.failed,
            "consumer terminated"
        );
        Ok(report)
    }
}
