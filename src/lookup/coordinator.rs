//! Run lifecycle: build the shared context, start the workers, join them.

use super::{
    BoundedQueue, Consumer, ConsumerReport, Producer, ProducerReport, ResultSink, SharedContext,
};
use crate::base::lookuperror::LookupError;
use crate::config::LookupConfig;
use crate::dns::Resolve;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub producer: ProducerReport,
    pub consumers: Vec<ConsumerReport>,
    pub records_written: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn resolved(&self) -> usize {
        self.consumers.iter().map(|c| c.resolved).sum()
    }

    pub fn failed(&self) -> usize {
        self.consumers.iter().map(|c| c.failed).sum()
    }

    pub fn processed(&self) -> usize {
        self.consumers.iter().map(ConsumerReport::processed).sum()
    }
}

/// Owns one run: configuration, resolver and the worker lifecycle.
///
/// # Example
///
/// ```rust,ignore
/// use multilookup::{config::LookupConfig, dns::GaiResolver, lookup::Coordinator};
///
/// let config = LookupConfig::new(vec!["names1.txt".into()], "results.txt");
/// let report = Coordinator::new(config, Arc::new(GaiResolver::new())).run()?;
/// println!("{} names resolved", report.resolved());
/// ```
pub struct Coordinator {
    config: LookupConfig,
    resolver: Arc<dyn Resolve>,
}

impl Coordinator {
    pub fn new(config: LookupConfig, resolver: Arc<dyn Resolve>) -> Self {
        Self { config, resolver }
    }

    /// Validates the configuration, truncates the output and runs to
    /// completion.
    pub fn run(&self) -> Result<RunReport, LookupError> {
        self.config.validate()?;
        let sink = ResultSink::create(&self.config.output)?;
        self.run_with_sink(&sink)
    }

    /// Runs against a caller-supplied sink instead of the configured output.
    ///
    /// Returns once the producer and every consumer have joined. If a
    /// consumer failed or any worker panicked, the first such error is
    /// returned after the join.
    pub fn run_with_sink<W: Write + Send>(
        &self,
        sink: &ResultSink<W>,
    ) -> Result<RunReport, LookupError> {
        self.config.validate()?;
        let started = Instant::now();

        let ctx = SharedContext {
            queue: BoundedQueue::new(self.config.queue_capacity),
            sink,
            resolver: &*self.resolver,
            family: self.config.address_family,
        };

        tracing::info!(
            inputs = self.config.inputs.len(),
            consumers = self.config.consumers,
            queue_capacity = self.config.queue_capacity,
            "starting lookup run"
        );

        let (producer, consumers, mut first_error) = thread::scope(|s| {
            let mut first_error: Option<LookupError> = None;

            // Attach every consumer before any work is queued, so an early
            // failure in one of them never reads as "all consumers gone".
            let guards: Vec<_> =
                (0..self.config.consumers).map(|_| ctx.queue.attach_consumer()).collect();

            let producer = Producer::new(&self.config.inputs, &ctx.queue);
            let producer_handle = match thread::Builder::new()
                .name("requester".into())
                .spawn_scoped(s, move || producer.run())
            {
                Ok(handle) => Some(handle),
                Err(e) => {
                    ctx.queue.close();
                    first_error = Some(spawn_failed("requester", e));
                    None
                }
            };

            let mut consumer_handles = Vec::with_capacity(guards.len());
            for (id, guard) in guards.into_iter().enumerate() {
                if first_error.is_some() {
                    // Remaining guards drop here and detach.
                    break;
                }
                let consumer = Consumer::new(id, &ctx, guard);
                let worker = format!("resolver-{}", id);
                match thread::Builder::new()
                    .name(worker.clone())
                    .spawn_scoped(s, move || consumer.run())
                {
                    Ok(handle) => consumer_handles.push((worker, handle)),
                    Err(e) => {
                        // Consumers already running keep draining; if none
                        // are left the producer sees `Disconnected`.
                        first_error = Some(spawn_failed(&worker, e));
                        break;
                    }
                }
            }

            let producer = match producer_handle.map(|h| h.join()) {
                Some(Ok(report)) => report,
                Some(Err(_)) => {
                    tracing::error!("requester panicked");
                    first_error.get_or_insert(LookupError::WorkerPanicked {
                        worker: "requester".into(),
                    });
                    ProducerReport::default()
                }
                None => ProducerReport::default(),
            };

            let mut consumers = Vec::with_capacity(consumer_handles.len());
            for (worker, handle) in consumer_handles {
                match handle.join() {
                    Ok(Ok(report)) => consumers.push(report),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        tracing::error!(worker = %worker, "consumer panicked");
                        first_error.get_or_insert(LookupError::WorkerPanicked { worker });
                    }
                }
            }

            (producer, consumers, first_error)
        });

        if producer.disconnected && first_error.is_none() {
            first_error = Some(LookupError::QueueDisconnected);
        }

        let report = RunReport {
            producer,
            consumers,
            records_written: sink.records_written(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            enqueued = report.producer.names_enqueued,
            resolved = report.resolved(),
            failed = report.failed(),
            skipped_sources = report.producer.sources_skipped.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "lookup run finished"
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

fn spawn_failed(worker: &str, e: std::io::Error) -> LookupError {
    tracing::error!(worker = %worker, error = %e, "failed to spawn worker");
    LookupError::WorkerSpawnFailed { worker: worker.to_string(), source: Arc::new(e) }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator").field("config", &self.config).finish_non_exhaustive()
    }
}
