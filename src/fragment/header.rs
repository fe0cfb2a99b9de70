use bytes::Bytes;

use super::MessageId;

/// A single decoded chunk of a logical message.
///
/// `chunk_index` is one-based: envelopes number chunks from zero and the
/// decoder adds one. A fragment whose index equals `total_chunks` is the final
/// fragment and completes the message.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use sink_receiver::fragment::{Fragment, MessageId};
/// let fragment = Fragment::new(MessageId::new("m1"), 3, 3, Bytes::from_static(b"EF"));
/// assert!(fragment.is_final());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    message_id: MessageId,
    chunk_index: i32,
    total_chunks: i32,
    payload: Bytes,
}

impl Fragment {
    /// Create a fragment from already normalised fields.
    #[must_use]
    pub fn new(message_id: MessageId, chunk_index: i32, total_chunks: i32, payload: Bytes) -> Self {
        Self {
            message_id,
            chunk_index,
            total_chunks,
            payload,
        }
    }

    /// Identity of the logical message this fragment belongs to.
    #[must_use]
    pub fn message_id(&self) -> &MessageId { &self.message_id }

    /// One-based position of this fragment.
    #[must_use]
    pub const fn chunk_index(&self) -> i32 { self.chunk_index }

    /// Number of fragments the sender declared for the message.
    #[must_use]
    pub const fn total_chunks(&self) -> i32 { self.total_chunks }

    /// Borrow the fragment's content.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Return `true` when this fragment completes its message.
    #[must_use]
    pub const fn is_final(&self) -> bool { self.chunk_index == self.total_chunks }

    /// Split the fragment into its identity and content.
    #[must_use]
    pub fn into_parts(self) -> (MessageId, Bytes) { (self.message_id, self.payload) }
}
