//! Fragment application and completion detection.
//!
//! [`ReassemblyTable::apply`] is the single entry point: it buffers non-final
//! fragments above the per-message watermark, silently drops anything at or
//! below it, and releases the concatenated payload when the final fragment
//! arrives. The watermark only tolerates redelivery of a prefix; a chunk that
//! overtakes its predecessor causes the predecessor to be dropped as stale.
//!
//! Entries are never evicted on a timer. A message whose final fragment never
//! arrives keeps its entry for the lifetime of the table.

use bytes::Bytes;
use log::{debug, warn};

use super::{KeyedAccumulator, ShardedAccumulator};
use crate::fragment::{Fragment, MessageId};

/// Container for a fully re-assembled message payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledMessage {
    message_id: MessageId,
    payload: Bytes,
}

impl ReassembledMessage {
    /// Construct a new [`ReassembledMessage`].
    #[must_use]
    pub fn new(message_id: MessageId, payload: Bytes) -> Self {
        Self {
            message_id,
            payload,
        }
    }

    /// Identifier shared by the fragments that formed this message.
    #[must_use]
    pub fn message_id(&self) -> &MessageId { &self.message_id }

    /// Borrow the re-assembled payload. It may legitimately be empty.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the message, returning the owned payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }
}

/// Result of applying a fragment to a [`ReassemblyTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FragmentStatus {
    /// The fragment was appended; the message still expects more fragments.
    Buffered,
    /// The fragment was at or below the watermark and was discarded.
    Stale,
    /// The fragment completed the message.
    Complete(ReassembledMessage),
}

/// Concurrent table of in-flight messages keyed by [`MessageId`].
///
/// The table is `Sync` whenever its accumulator is, so one instance can be
/// shared behind an `Arc` by several consumers.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use sink_receiver::{
///     fragment::{Fragment, MessageId},
///     reassembly::ReassemblyTable,
/// };
///
/// let table: ReassemblyTable = ReassemblyTable::default();
/// let id = MessageId::new("m1");
/// assert!(table.apply(Fragment::new(id.clone(), 1, 2, Bytes::from_static(b"AB"))).is_none());
/// let done = table
///     .apply(Fragment::new(id, 2, 2, Bytes::from_static(b"CD")))
///     .expect("final fragment completes the message");
/// assert_eq!(done.payload(), b"ABCD");
/// assert_eq!(table.in_flight(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ReassemblyTable<A = ShardedAccumulator> {
    entries: A,
}

impl<A: KeyedAccumulator> ReassemblyTable<A> {
    /// Create a table over the given accumulator.
    #[must_use]
    pub fn new(entries: A) -> Self { Self { entries } }

    /// Apply a fragment, returning the complete message when this fragment
    /// finishes it.
    ///
    /// `None` means the message is still incomplete; a completed message with
    /// an empty payload is returned as `Some`.
    pub fn apply(&self, fragment: Fragment) -> Option<ReassembledMessage> {
        match self.apply_with_status(fragment) {
            FragmentStatus::Complete(message) => Some(message),
            FragmentStatus::Buffered | FragmentStatus::Stale => None,
        }
    }

    /// Apply a fragment and report how it was handled.
    pub fn apply_with_status(&self, fragment: Fragment) -> FragmentStatus {
        let chunk = fragment.chunk_index();
        let total = fragment.total_chunks();
        let is_final = fragment.is_final();
        let (message_id, payload) = fragment.into_parts();

        if !is_final {
            let accepted = self
                .entries
                .with_entry(&message_id, |entry| entry.accept(chunk, &payload));
            if accepted {
                debug!(
                    "adding {} bytes to buffer for message {message_id} (chunk {chunk} of {total})",
                    payload.len()
                );
                return FragmentStatus::Buffered;
            }
            debug!("chunk {chunk} from {message_id} was already processed, ignoring");
            return FragmentStatus::Stale;
        }

        if total == 1 {
            return FragmentStatus::Complete(ReassembledMessage::new(message_id, payload));
        }

        let complete = if let Some(partial) = self.entries.take(&message_id) {
            debug!(
                "adding {} bytes to final message {message_id} ({} bytes buffered)",
                payload.len(),
                partial.len()
            );
            partial.finish(&payload)
        } else {
            warn!(
                "final chunk {chunk} of {total} for message {message_id} arrived without \
                 earlier chunks; releasing it alone"
            );
            payload
        };
        FragmentStatus::Complete(ReassembledMessage::new(message_id, complete))
    }

    /// Number of messages currently awaiting their final fragment.
    #[must_use]
    pub fn in_flight(&self) -> usize { self.entries.len() }

    /// Return `true` when `message_id` has buffered fragments.
    #[must_use]
    pub fn contains(&self, message_id: &MessageId) -> bool { self.entries.contains(message_id) }
}
