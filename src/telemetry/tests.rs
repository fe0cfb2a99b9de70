use prost::Message;
use serde_json::Value;

use super::unwrap_flows;
use crate::{
    error::DecodeError,
    proto::{Direction, FlowMessage, NetflowVersion, TelemetryMessage, TelemetryMessageLog},
};

fn flow(src: &str, bytes: u64) -> FlowMessage {
    FlowMessage {
        timestamp: 1_700_000_000_000,
        num_bytes: Some(bytes),
        direction: Direction::Egress as i32,
        src_address: src.to_owned(),
        dst_address: "192.0.2.1".to_owned(),
        netflow_version: NetflowVersion::Ipfix as i32,
        ..FlowMessage::default()
    }
}

fn envelope(records: Vec<Vec<u8>>) -> Vec<u8> {
    TelemetryMessageLog {
        location: "Default".to_owned(),
        system_id: "minion-1".to_owned(),
        source_address: Some("198.51.100.7".to_owned()),
        source_port: Some(4739),
        message: records
            .into_iter()
            .enumerate()
            .map(|(n, bytes)| TelemetryMessage {
                timestamp: 1_000 + n as u64,
                bytes,
            })
            .collect(),
    }
    .encode_to_vec()
}

#[test]
fn unwraps_records_in_envelope_order() {
    let payload = envelope(vec![
        flow("10.0.0.1", 10).encode_to_vec(),
        flow("10.0.0.2", 20).encode_to_vec(),
        flow("10.0.0.3", 30).encode_to_vec(),
    ]);

    let batch = unwrap_flows(&payload).expect("valid telemetry envelope");

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.location(), "Default");
    assert_eq!(batch.system_id(), "minion-1");
    assert_eq!(batch.source_address(), Some("198.51.100.7"));
    assert_eq!(batch.source_port(), Some(4739));
    let sources: Vec<_> = batch
        .records()
        .iter()
        .map(|record| record.flow().src_address.as_str())
        .collect();
    assert_eq!(sources, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    assert_eq!(batch.records()[2].captured_at(), 1_002);
}

#[test]
fn malformed_inner_record_fails_whole_batch() {
    let payload = envelope(vec![
        flow("10.0.0.1", 10).encode_to_vec(),
        // Field 1 varint key with no value.
        vec![0x08],
        flow("10.0.0.3", 30).encode_to_vec(),
    ]);

    let err = unwrap_flows(&payload).expect_err("malformed record rejects the batch");

    assert!(matches!(err, DecodeError::Flow { position: 1, .. }));
}

#[test]
fn malformed_envelope_is_rejected() {
    let err = unwrap_flows(&[0xff, 0xff]).expect_err("garbage is not an envelope");

    assert!(matches!(err, DecodeError::Telemetry(_)));
}

#[test]
fn empty_envelope_yields_no_records() {
    let batch = unwrap_flows(&envelope(Vec::new())).expect("valid telemetry envelope");

    assert!(batch.is_empty());
    assert!(batch.render().expect("nothing to render").is_empty());
}

#[test]
fn renders_flows_as_json_with_enum_names() {
    let batch = unwrap_flows(&envelope(vec![flow("10.0.0.9", 512).encode_to_vec()]))
        .expect("valid telemetry envelope");

    let rendered = batch.render().expect("flow renders");
    assert_eq!(rendered.len(), 1);
    let json: Value = serde_json::from_slice(&rendered[0]).expect("rendered flow is JSON");

    assert_eq!(json["src_address"], "10.0.0.9");
    assert_eq!(json["num_bytes"], 512);
    assert_eq!(json["direction"], "EGRESS");
    assert_eq!(json["netflow_version"], "IPFIX");
    assert_eq!(json["sampling_algorithm"], "UNASSIGNED");
    assert!(json.get("src_port").is_none(), "absent wrappers are omitted");
}

#[test]
fn unknown_enum_values_render_numerically() {
    let mut odd = flow("10.0.0.10", 1);
    odd.direction = 42;
    let batch =
        unwrap_flows(&envelope(vec![odd.encode_to_vec()])).expect("valid telemetry envelope");

    let rendered = batch.render().expect("flow renders");
    let json: Value = serde_json::from_slice(&rendered[0]).expect("rendered flow is JSON");

    assert_eq!(json["direction"], 42);
}
