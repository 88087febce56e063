//! Producer/consumer lookup core.
//!
//! One [`Producer`] feeds hostnames into a [`BoundedQueue`]; a fixed pool of
//! [`Consumer`]s drains it, resolves each name and appends the result to a
//! shared [`ResultSink`]. The [`Coordinator`] owns all three shared pieces
//! and the worker lifecycle.
//!
//! ```text
//!  inputs ──▶ Producer ──push──▶ BoundedQueue ──pop──▶ Consumer × N ──append──▶ ResultSink
//!                 │                   ▲
//!                 └──── close() ──────┘   (completion flag, broadcast)
//! ```

pub mod consumer;
pub mod coordinator;
pub mod producer;
pub mod queue;
pub mod sink;

pub use consumer::{Consumer, ConsumerReport};
pub use coordinator::{Coordinator, RunReport};
pub use producer::{Producer, ProducerReport};
pub use queue::{BoundedQueue, ConsumerGuard, Disconnected};
pub use sink::ResultSink;

use crate::dns::{AddressFamily, Name, Resolve};
use std::io::Write;

/// Everything the workers share, built once by the coordinator and lent to
/// each worker for the length of the run.
pub struct SharedContext<'a, W: Write> {
    pub queue: BoundedQueue<Name>,
    pub sink: &'a ResultSink<W>,
    pub resolver: &'a dyn Resolve,
    pub family: AddressFamily,
}
