//! Envelope used by the RPC API.

use std::collections::HashMap;

/// A single chunk of an RPC request or response.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RpcMessageProto {
    #[prost(string, required, tag = "1")]
    pub rpc_id: String,
    #[prost(bytes = "vec", required, tag = "2")]
    pub rpc_content: Vec<u8>,
    #[prost(string, required, tag = "3")]
    pub system_id: String,
    #[prost(string, required, tag = "4")]
    pub location: String,
    #[prost(string, required, tag = "5")]
    pub module_id: String,
    /// Absolute expiry in milliseconds since the Unix epoch.
    #[prost(uint64, required, tag = "6")]
    pub expiration_time: u64,
    #[prost(int32, optional, tag = "7")]
    pub current_chunk_number: Option<i32>,
    #[prost(int32, optional, tag = "8")]
    pub total_chunks: Option<i32>,
    #[prost(map = "string, string", tag = "9")]
    pub tracing_info: HashMap<String, String>,
}
