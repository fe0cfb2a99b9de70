//! Unit tests for envelope decoding and normalisation.

use bytes::Bytes;
use prost::Message;
use rstest::rstest;

use super::{Fragment, IpcMode, MessageId};
use crate::{
    config::ConfigError,
    error::DecodeError,
    proto::{RpcMessageProto, SinkMessage},
};

fn sink_bytes(id: &str, current: Option<i32>, total: Option<i32>, content: &[u8]) -> Vec<u8> {
    SinkMessage {
        message_id: id.to_owned(),
        content: content.to_vec(),
        current_chunk_number: current,
        total_chunks: total,
        ..SinkMessage::default()
    }
    .encode_to_vec()
}

fn rpc_bytes(id: &str, current: Option<i32>, total: Option<i32>, content: &[u8]) -> Vec<u8> {
    RpcMessageProto {
        rpc_id: id.to_owned(),
        rpc_content: content.to_vec(),
        system_id: "minion-1".to_owned(),
        location: "Default".to_owned(),
        module_id: "SNMP".to_owned(),
        expiration_time: 1_700_000_000_000,
        current_chunk_number: current,
        total_chunks: total,
        ..RpcMessageProto::default()
    }
    .encode_to_vec()
}

#[test]
fn sink_and_rpc_envelopes_normalise_identically() {
    let sink = IpcMode::Sink
        .decode(&sink_bytes("abc", Some(1), Some(3), b"payload"))
        .expect("sink envelope decodes");
    let rpc = IpcMode::Rpc
        .decode(&rpc_bytes("abc", Some(1), Some(3), b"payload"))
        .expect("rpc envelope decodes");

    assert_eq!(sink, rpc);
    assert_eq!(
        sink,
        Fragment::new(MessageId::new("abc"), 2, 3, Bytes::from_static(b"payload"))
    );
}

#[test]
fn single_chunk_envelope_is_final() {
    let fragment = IpcMode::Sink
        .decode(&sink_bytes("solo", Some(0), Some(1), b"hello"))
        .expect("sink envelope decodes");

    assert_eq!(fragment.chunk_index(), 1);
    assert_eq!(fragment.total_chunks(), 1);
    assert!(fragment.is_final());
    assert_eq!(fragment.payload().as_ref(), b"hello");
}

#[test]
fn zero_length_content_is_preserved() {
    let fragment = IpcMode::Rpc
        .decode(&rpc_bytes("empty", Some(0), Some(2), b""))
        .expect("rpc envelope decodes");

    assert!(fragment.payload().is_empty());
    assert!(!fragment.is_final());
}

#[rstest]
#[case::sink(IpcMode::Sink)]
#[case::rpc(IpcMode::Rpc)]
fn truncated_envelope_is_rejected(#[case] mode: IpcMode) {
    // Field 1 announces sixteen bytes of identity but the buffer ends.
    let err = mode
        .decode(&[0x0a, 0x10, b'a'])
        .expect_err("truncated envelope must be rejected");

    assert!(matches!(err, DecodeError::Envelope { format, .. } if format == mode.as_str()));
}

#[rstest]
#[case::sink(IpcMode::Sink)]
#[case::rpc(IpcMode::Rpc)]
fn empty_payload_lacks_identity(#[case] mode: IpcMode) {
    let err = mode
        .decode(&[])
        .expect_err("an envelope without identity must be rejected");

    assert!(matches!(err, DecodeError::MissingIdentity { .. }));
}

#[rstest]
#[case::past_total(Some(3), Some(3))]
#[case::negative(Some(-2), Some(3))]
#[case::missing_total(Some(0), None)]
#[case::zero_total(Some(0), Some(0))]
fn chunk_outside_declared_total_is_rejected(
    #[case] current: Option<i32>,
    #[case] total: Option<i32>,
) {
    let err = IpcMode::Sink
        .decode(&sink_bytes("bad", current, total, b"x"))
        .expect_err("chunk outside the declared range must be rejected");

    assert!(matches!(
        err,
        DecodeError::ChunkOutOfRange { ref message_id, .. } if message_id.as_str() == "bad"
    ));
}

#[test]
fn missing_chunk_number_defaults_to_first_chunk() {
    let fragment = IpcMode::Sink
        .decode(&sink_bytes("first", None, Some(2), b"AB"))
        .expect("sink envelope decodes");

    assert_eq!(fragment.chunk_index(), 1);
}

#[rstest]
#[case("sink", IpcMode::Sink)]
#[case("rpc", IpcMode::Rpc)]
fn ipc_mode_parses_known_names(#[case] name: &str, #[case] expected: IpcMode) {
    assert_eq!(name.parse::<IpcMode>().expect("known mode"), expected);
    assert_eq!(expected.to_string(), name);
}

#[rstest]
#[case("")]
#[case("SINK")]
#[case("netflow")]
fn ipc_mode_rejects_unknown_names(#[case] name: &str) {
    let err = name.parse::<IpcMode>().expect_err("unknown mode");
    assert!(matches!(err, ConfigError::InvalidIpc(ref value) if value == name));
}
