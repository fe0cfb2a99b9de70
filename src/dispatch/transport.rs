//! Boundary with the message broker.

use std::{fmt, io, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors surfaced by a [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport has no further events to deliver.
    #[error("transport closed")]
    Closed,
    /// Reading from the underlying stream failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
    /// The broker client reported an error.
    #[error("broker error: {0}")]
    Broker(String),
}

impl TransportError {
    /// Return `true` when the transport will never deliver another event.
    #[must_use]
    pub fn is_closed(&self) -> bool { matches!(self, Self::Closed) }
}

/// Raw payload delivered from a topic partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Topic the record was read from.
    pub topic: String,
    /// Partition within the topic.
    pub partition: i32,
    /// Offset within the partition.
    pub offset: i64,
    /// Undecoded envelope bytes.
    pub payload: Bytes,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@{}", self.topic, self.partition, self.offset)
    }
}

/// Event produced by a single [`Transport::poll`].
#[derive(Debug)]
pub enum Event {
    /// A raw fragment.
    Fragment(Record),
    /// A transport failure. Only [`TransportError::Closed`] stops the loop.
    Error(TransportError),
    /// Periodic client statistics as a JSON document.
    Stats(String),
}

/// Source of raw fragments with at-least-once delivery.
///
/// Records of one partition must be delivered in offset order.
/// Implementations must be cancellation-safe: dropping a pending `poll()`
/// future must not lose a record.
#[async_trait]
pub trait Transport: Send {
    /// Wait up to `timeout` for the next event, returning `None` when the
    /// timeout elapses first.
    async fn poll(&mut self, timeout: Duration) -> Option<Event>;

    /// Mark `record` as processed so it is not redelivered.
    async fn commit(&mut self, record: &Record) -> Result<(), TransportError>;

    /// Release the transport's resources.
    async fn close(&mut self) -> Result<(), TransportError>;
}
