//! Envelope used by the Sink API.

use std::collections::HashMap;

/// A single chunk of a Sink API message.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SinkMessage {
    /// Identity shared by every chunk of one logical message.
    #[prost(string, required, tag = "1")]
    pub message_id: String,
    /// Bytes carried by this chunk.
    #[prost(bytes = "vec", required, tag = "2")]
    pub content: Vec<u8>,
    /// Zero-based position of this chunk.
    #[prost(int32, optional, tag = "3")]
    pub current_chunk_number: Option<i32>,
    /// Number of chunks the producer emitted for the message.
    #[prost(int32, optional, tag = "4")]
    pub total_chunks: Option<i32>,
    #[prost(map = "string, string", tag = "5")]
    pub tracing_info: HashMap<String, String>,
}
