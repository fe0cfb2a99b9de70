//! Transport that replays captured topic records from a byte stream.
//!
//! A capture is a sequence of length-delimited frames, each a 4-byte
//! big-endian length followed by the raw record value exactly as it was read
//! from the topic. Records are assigned consecutive offsets on partition 0 of
//! a single topic, which preserves the in-partition ordering the reassembly
//! table relies on.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use tokio::{io::AsyncRead, time::timeout};
use tokio_util::codec::{FramedRead, LengthDelimitedCodec};

use crate::dispatch::{Event, Record, Transport, TransportError};

/// Largest record accepted from a capture.
pub const DEFAULT_MAX_RECORD_LENGTH: usize = 16 * 1024 * 1024;

/// [`Transport`] reading length-delimited records from any async reader.
pub struct ReplayTransport<R> {
    frames: FramedRead<R, LengthDelimitedCodec>,
    topic: String,
    next_offset: i64,
    committed: Option<i64>,
    finished: bool,
}

impl<R: AsyncRead + Unpin + Send> ReplayTransport<R> {
    /// Replay records from `reader` as if consumed from `topic`.
    pub fn new(reader: R, topic: impl Into<String>) -> Self {
        Self::with_max_record_length(reader, topic, DEFAULT_MAX_RECORD_LENGTH)
    }

    /// Replay records, rejecting any longer than `max_record_length`.
    pub fn with_max_record_length(
        reader: R,
        topic: impl Into<String>,
        max_record_length: usize,
    ) -> Self {
        let codec = LengthDelimitedCodec::builder()
            .length_field_length(4)
            .max_frame_length(max_record_length)
            .new_codec();
        Self {
            frames: FramedRead::new(reader, codec),
            topic: topic.into(),
            next_offset: 0,
            committed: None,
            finished: false,
        }
    }

    /// Offset of the most recently committed record.
    #[must_use]
    pub const fn committed_offset(&self) -> Option<i64> { self.committed }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> Transport for ReplayTransport<R> {
    async fn poll(&mut self, wait: Duration) -> Option<Event> {
        if self.finished {
            return Some(Event::Error(TransportError::Closed));
        }
        let next = timeout(wait, self.frames.next()).await.ok()?;
        match next {
            Some(Ok(frame)) => {
                let offset = self.next_offset;
                self.next_offset += 1;
                Some(Event::Fragment(Record {
                    topic: self.topic.clone(),
                    partition: 0,
                    offset,
                    payload: frame.freeze(),
                }))
            }
            Some(Err(err)) => {
                // Framing is lost after a bad length prefix; nothing after it
                // can be trusted.
                self.finished = true;
                Some(Event::Error(TransportError::Io(err)))
            }
            None => {
                debug!("end of capture after {} records", self.next_offset);
                self.finished = true;
                Some(Event::Error(TransportError::Closed))
            }
        }
    }

    async fn commit(&mut self, record: &Record) -> Result<(), TransportError> {
        self.committed = Some(record.offset);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.finished = true;
        Ok(())
    }
}
