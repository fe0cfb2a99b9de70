//! Builders for encoded IPC and telemetry envelopes.

use prost::Message;
use sink_receiver::proto::{
    FlowMessage,
    RpcMessageProto,
    SinkMessage,
    TelemetryMessage,
    TelemetryMessageLog,
};

/// Encode a single Sink envelope with a 0-based `current` chunk number.
#[must_use]
pub fn sink_chunk(id: &str, current: i32, total: i32, content: &[u8]) -> Vec<u8> {
    SinkMessage {
        message_id: id.to_owned(),
        content: content.to_vec(),
        current_chunk_number: Some(current),
        total_chunks: Some(total),
        ..SinkMessage::default()
    }
    .encode_to_vec()
}

/// Encode a single RPC envelope with a 0-based `current` chunk number.
#[must_use]
pub fn rpc_chunk(id: &str, current: i32, total: i32, content: &[u8]) -> Vec<u8> {
    RpcMessageProto {
        rpc_id: id.to_owned(),
        rpc_content: content.to_vec(),
        system_id: "minion-1".to_owned(),
        location: "Default".to_owned(),
        module_id: "Echo".to_owned(),
        current_chunk_number: Some(current),
        total_chunks: Some(total),
        ..RpcMessageProto::default()
    }
    .encode_to_vec()
}

/// Split `payload` into Sink envelopes of at most `chunk_size` bytes.
///
/// An empty payload still produces one envelope.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
#[must_use]
pub fn sink_chunks(id: &str, payload: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
    split(payload, chunk_size, |current, total, part| {
        sink_chunk(id, current, total, part)
    })
}

/// Split `payload` into RPC envelopes of at most `chunk_size` bytes.
///
/// # Panics
///
/// Panics if `chunk_size` is zero.
#[must_use]
pub fn rpc_chunks(id: &str, payload: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
    split(payload, chunk_size, |current, total, part| {
        rpc_chunk(id, current, total, part)
    })
}

fn split(
    payload: &[u8],
    chunk_size: usize,
    encode: impl Fn(i32, i32, &[u8]) -> Vec<u8>,
) -> Vec<Vec<u8>> {
    assert!(chunk_size > 0, "chunk size must be positive");
    let parts: Vec<&[u8]> = if payload.is_empty() {
        vec![payload]
    } else {
        payload.chunks(chunk_size).collect()
    };
    let total = i32::try_from(parts.len()).expect("chunk count fits in i32");
    parts
        .into_iter()
        .zip(0..)
        .map(|(part, current)| encode(current, total, part))
        .collect()
}

/// Wrap encoded flow records in a telemetry envelope.
#[must_use]
pub fn telemetry_envelope(records: impl IntoIterator<Item = Vec<u8>>) -> Vec<u8> {
    TelemetryMessageLog {
        location: "Default".to_owned(),
        system_id: "minion-1".to_owned(),
        source_address: Some("192.0.2.10".to_owned()),
        source_port: Some(2055),
        message: records
            .into_iter()
            .zip(1_u64..)
            .map(|(bytes, timestamp)| TelemetryMessage { timestamp, bytes })
            .collect(),
    }
    .encode_to_vec()
}

/// Encode a flow record identified by its source port.
#[must_use]
pub fn flow(src_port: u32) -> Vec<u8> {
    FlowMessage {
        src_port: Some(src_port),
        dst_port: Some(443),
        src_address: "198.51.100.7".to_owned(),
        ..FlowMessage::default()
    }
    .encode_to_vec()
}
