//! Decoder, reassembly table and Sink parser composed into one step.

use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info};

use crate::{
    error::DecodeError,
    fragment::IpcMode,
    metrics::{self, DecodeStage},
    parser::SinkParser,
    reassembly::{FragmentStatus, KeyedAccumulator, ReassemblyTable, ShardedAccumulator},
};

/// Per-fragment processing shared by every consumer of a topic.
///
/// The table sits behind an [`Arc`] so several pipelines, one per consumer,
/// can reassemble into the same table.
#[derive(Debug)]
pub struct Pipeline<A = ShardedAccumulator> {
    mode: IpcMode,
    parser: Option<SinkParser>,
    table: Arc<ReassemblyTable<A>>,
}

impl Pipeline {
    /// Create a pipeline with a fresh, unshared table.
    #[must_use]
    pub fn new(mode: IpcMode, parser: Option<SinkParser>) -> Self {
        Self::with_table(mode, parser, Arc::new(ReassemblyTable::default()))
    }
}

impl<A: KeyedAccumulator> Pipeline<A> {
    /// Create a pipeline over an existing, possibly shared, table.
    #[must_use]
    pub fn with_table(
        mode: IpcMode,
        parser: Option<SinkParser>,
        table: Arc<ReassemblyTable<A>>,
    ) -> Self {
        Self {
            mode,
            parser,
            table,
        }
    }

    /// Envelope format this pipeline decodes.
    #[must_use]
    pub const fn mode(&self) -> IpcMode { self.mode }

    /// Parser applied to completed payloads, if any.
    #[must_use]
    pub const fn parser(&self) -> Option<SinkParser> { self.parser }

    /// Borrow the reassembly table.
    #[must_use]
    pub fn table(&self) -> &Arc<ReassemblyTable<A>> { &self.table }

    /// Run one raw transport payload through the pipeline.
    ///
    /// Returns `Ok(None)` while the message is incomplete. Once complete, the
    /// returned units are either the reassembled payload itself or the
    /// JSON documents produced by the configured [`SinkParser`]. An empty
    /// vector is a completed telemetry batch with no records.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the envelope or the parsed document is
    /// malformed. Nothing is emitted for a document that fails anywhere.
    pub fn process(&self, raw: &[u8]) -> Result<Option<Vec<Bytes>>, DecodeError> {
        metrics::inc_chunks();
        let fragment = self
            .mode
            .decode(raw)
            .inspect_err(|_| metrics::inc_decode_errors(DecodeStage::Envelope))?;
        debug!(
            "received message {} (chunk {} of {}, with {} bytes)",
            fragment.message_id(),
            fragment.chunk_index(),
            fragment.total_chunks(),
            fragment.payload().len()
        );

        let status = self.table.apply_with_status(fragment);
        metrics::set_in_flight(self.table.in_flight());
        let message = match status {
            FragmentStatus::Complete(message) => message,
            FragmentStatus::Stale => {
                metrics::inc_stale();
                return Ok(None);
            }
            FragmentStatus::Buffered => return Ok(None),
        };
        metrics::inc_messages();

        let Some(parser) = self.parser else {
            info!(
                "processing {} message {} of {} bytes",
                self.mode,
                message.message_id(),
                message.payload().len()
            );
            return Ok(Some(vec![message.into_payload()]));
        };

        debug!("parsing message {} as {parser}", message.message_id());
        let units = parser
            .parse(message.payload())
            .inspect_err(|_| metrics::inc_decode_errors(DecodeStage::Payload))?;
        Ok(Some(units))
    }
}
