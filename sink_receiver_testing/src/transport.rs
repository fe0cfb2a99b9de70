//! In-memory [`Transport`] driven by a fixed script of events.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use sink_receiver::{Event, Record, Transport, TransportError};

/// Offsets committed by a [`ScriptedTransport`], readable after the
/// transport has moved into a dispatcher.
#[derive(Clone, Debug, Default)]
pub struct CommitLog(Arc<Mutex<Vec<i64>>>);

impl CommitLog {
    /// Snapshot of the committed offsets in commit order.
    #[must_use]
    pub fn offsets(&self) -> Vec<i64> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, offset: i64) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(offset);
    }
}

/// Yields each scripted event once, then reports
/// [`TransportError::Closed`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    events: VecDeque<Event>,
    commits: CommitLog,
}

impl ScriptedTransport {
    /// Script the given events.
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            commits: CommitLog::default(),
        }
    }

    /// Script one fragment event per payload, at offsets counting from zero.
    pub fn from_payloads(payloads: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self::new(
            payloads
                .into_iter()
                .zip(0..)
                .map(|(payload, offset)| fragment_event(offset, payload)),
        )
    }

    /// Shared view of the offsets this transport commits.
    #[must_use]
    pub fn commit_log(&self) -> CommitLog { self.commits.clone() }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn poll(&mut self, _timeout: Duration) -> Option<Event> {
        Some(
            self.events
                .pop_front()
                .unwrap_or(Event::Error(TransportError::Closed)),
        )
    }

    async fn commit(&mut self, record: &Record) -> Result<(), TransportError> {
        self.commits.push(record.offset);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.events.clear();
        Ok(())
    }
}

/// Build a fragment event on partition 0 of a test topic.
#[must_use]
pub fn fragment_event(offset: i64, payload: Vec<u8>) -> Event {
    Event::Fragment(Record {
        topic: "OpenNMS.Sink.Events".to_owned(),
        partition: 0,
        offset,
        payload: Bytes::from(payload),
    })
}
