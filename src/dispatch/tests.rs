//! Tests for the dispatch loop and its pipeline.

use std::{collections::VecDeque, future, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use prost::Message;
use rstest::{fixture, rstest};
use tokio::time::timeout;

use super::{
    ConsumerStats,
    Dispatcher,
    Event,
    LoopState,
    Pipeline,
    Record,
    Transport,
    TransportError,
    byte_count,
};
use crate::{
    config::{ConfigError, ReceiverConfig},
    error::{DecodeError, StartupError},
    fragment::IpcMode,
    parser::SinkParser,
    proto::{FlowMessage, SinkMessage, TelemetryMessage, TelemetryMessageLog},
};

/// Replays a fixed list of events, then reports the transport as closed.
#[derive(Default)]
struct ScriptedTransport {
    events: VecDeque<Event>,
    polls: usize,
    commits: Vec<i64>,
}

impl ScriptedTransport {
    fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn poll(&mut self, _timeout: Duration) -> Option<Event> {
        self.polls += 1;
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

/// Never yields an event.
struct SilentTransport;

#[async_trait]
impl Transport for SilentTransport {
    async fn poll(&mut self, _timeout: Duration) -> Option<Event> { future::pending().await }

    async fn commit(&mut self, _record: &Record) -> Result<(), TransportError> { Ok(()) }

    async fn close(&mut self) -> Result<(), TransportError> { Ok(()) }
}

fn sink_chunk(id: &str, current: i32, total: i32, content: &[u8]) -> Vec<u8> {
    SinkMessage {
        message_id: id.to_owned(),
        content: content.to_vec(),
        current_chunk_number: Some(current),
        total_chunks: Some(total),
        ..SinkMessage::default()
    }
    .encode_to_vec()
}

fn record(offset: i64, payload: Vec<u8>) -> Event {
    Event::Fragment(Record {
        topic: "OpenNMS.Sink.Telemetry-Netflow-9".to_owned(),
        partition: 0,
        offset,
        payload: Bytes::from(payload),
    })
}

fn telemetry_payload(records: Vec<Vec<u8>>) -> Vec<u8> {
    TelemetryMessageLog {
        location: "Default".to_owned(),
        system_id: "minion-1".to_owned(),
        message: records
            .into_iter()
            .map(|bytes| TelemetryMessage {
                timestamp: 1,
                bytes,
            })
            .collect(),
        ..TelemetryMessageLog::default()
    }
    .encode_to_vec()
}

fn flow_bytes(port: u32) -> Vec<u8> {
    FlowMessage {
        src_port: Some(port),
        ..FlowMessage::default()
    }
    .encode_to_vec()
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
fn sink_pipeline() -> Pipeline { Pipeline::new(IpcMode::Sink, None) }

#[rstest]
fn pipeline_holds_back_incomplete_messages(sink_pipeline: Pipeline) {
    let first = sink_pipeline
        .process(&sink_chunk("m1", 0, 2, b"AB"))
        .expect("valid chunk");
    let replay = sink_pipeline
        .process(&sink_chunk("m1", 0, 2, b"AB"))
        .expect("valid chunk");
    let last = sink_pipeline
        .process(&sink_chunk("m1", 1, 2, b"CD"))
        .expect("valid chunk");

    assert_eq!(first, None);
    assert_eq!(replay, None);
    assert_eq!(last, Some(vec![Bytes::from_static(b"ABCD")]));
    assert_eq!(sink_pipeline.table().in_flight(), 0);
}

#[rstest]
fn pipeline_releases_empty_message(sink_pipeline: Pipeline) {
    let released = sink_pipeline
        .process(&sink_chunk("nothing", 0, 1, b""))
        .expect("valid chunk");

    assert_eq!(released, Some(vec![Bytes::new()]));
}

#[rstest]
fn pipeline_rejects_malformed_envelope(sink_pipeline: Pipeline) {
    let err = sink_pipeline
        .process(&[0x0a, 0x10])
        .expect_err("truncated envelope");

    assert!(matches!(err, DecodeError::Envelope { .. }));
}

#[test]
fn telemetry_pipeline_emits_nothing_for_a_bad_batch() {
    let pipeline = Pipeline::new(IpcMode::Sink, Some(SinkParser::Netflow));
    let payload = telemetry_payload(vec![flow_bytes(1), vec![0x08], flow_bytes(3)]);

    let err = pipeline
        .process(&sink_chunk("t", 0, 1, &payload))
        .expect_err("malformed record");

    assert!(matches!(err, DecodeError::Flow { position: 1, .. }));
}

#[tokio::test]
async fn dispatcher_emits_telemetry_records_in_order() {
    let payload = telemetry_payload(vec![flow_bytes(1), flow_bytes(2), flow_bytes(3)]);
    let (head, tail) = payload.split_at(payload.len() / 2);
    let transport = ScriptedTransport::new([
        record(10, sink_chunk("batch", 0, 2, head)),
        record(11, sink_chunk("batch", 1, 2, tail)),
    ]);
    let mut dispatcher = Dispatcher::new(
        transport,
        Pipeline::new(IpcMode::Sink, Some(SinkParser::Netflow)),
        Duration::from_millis(10),
    );
    let mut ports = Vec::new();
    let mut handler = |unit: &[u8]| {
        let json: serde_json::Value = serde_json::from_slice(unit).expect("JSON record");
        ports.push(json["src_port"].as_u64().expect("port present"));
    };

    let state = dispatcher.run(&mut handler).await;

    assert_eq!(state, LoopState::Stopped);
    assert_eq!(ports, [1, 2, 3]);
    assert_eq!(dispatcher.transport().commits, [10, 11]);
}

#[tokio::test]
async fn dispatcher_commits_undecodable_fragments_and_continues() {
    let transport = ScriptedTransport::new([
        record(1, vec![0x0a, 0x10]),
        Event::Error(TransportError::Broker("broker down".to_owned())),
        Event::Stats(r#"{"rxmsgs": 2, "rxmsg_bytes": 2048}"#.to_owned()),
        Event::Stats("not json".to_owned()),
        record(2, sink_chunk("ok", 0, 1, b"hello")),
    ]);
    let mut dispatcher = Dispatcher::new(
        transport,
        Pipeline::new(IpcMode::Sink, None),
        Duration::from_millis(10),
    );
    let mut received = Vec::new();
    let mut handler = |unit: &[u8]| received.push(unit.to_vec());

    dispatcher.run(&mut handler).await;

    assert_eq!(received, [b"hello".to_vec()]);
    assert_eq!(dispatcher.transport().commits, [1, 2]);
}

#[tokio::test]
async fn stopped_dispatcher_never_polls() {
    let mut dispatcher = Dispatcher::new(
        ScriptedTransport::new([record(1, sink_chunk("m", 0, 1, b"x"))]),
        Pipeline::new(IpcMode::Sink, None),
        Duration::from_millis(10),
    );
    let handle = dispatcher.stop_handle();
    handle.stop();
    let mut calls = 0;
    let mut handler = |_: &[u8]| calls += 1;

    let state = dispatcher.run(&mut handler).await;

    assert_eq!(state, LoopState::Stopped);
    assert!(handle.is_stopped());
    assert_eq!(dispatcher.transport().polls, 0);
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn handler_stop_takes_effect_after_the_current_record() {
    let mut dispatcher = Dispatcher::new(
        ScriptedTransport::new([
            record(0, sink_chunk("a", 0, 1, b"1")),
            record(1, sink_chunk("b", 0, 1, b"2")),
            record(2, sink_chunk("c", 0, 1, b"3")),
        ]),
        Pipeline::new(IpcMode::Sink, None),
        Duration::from_millis(10),
    );
    let handle = dispatcher.stop_handle();
    let mut seen = Vec::new();
    let mut handler = |unit: &[u8]| {
        seen.push(unit.to_vec());
        handle.stop();
    };

    let state = dispatcher.run(&mut handler).await;

    assert_eq!(state, LoopState::Stopped);
    assert_eq!(seen, [b"1".to_vec()]);
    assert_eq!(dispatcher.transport().commits, [0]);
    assert_eq!(dispatcher.transport().polls, 1);
}

#[tokio::test]
async fn handler_stop_still_delivers_the_rest_of_a_batch() {
    let payload = telemetry_payload(vec![flow_bytes(1), flow_bytes(2)]);
    let mut dispatcher = Dispatcher::new(
        ScriptedTransport::new([
            record(0, sink_chunk("batch", 0, 1, &payload)),
            record(1, sink_chunk("next", 0, 1, &payload)),
        ]),
        Pipeline::new(IpcMode::Sink, Some(SinkParser::Netflow)),
        Duration::from_millis(10),
    );
    let handle = dispatcher.stop_handle();
    let mut units = 0;
    let mut handler = |_: &[u8]| {
        units += 1;
        handle.stop();
    };

    dispatcher.run(&mut handler).await;

    assert_eq!(units, 2);
    assert_eq!(dispatcher.transport().commits, [0]);
}

#[tokio::test]
async fn stop_interrupts_a_pending_poll() {
    let mut dispatcher = Dispatcher::new(
        SilentTransport,
        Pipeline::new(IpcMode::Rpc, None),
        Duration::from_secs(30),
    );
    let handle = dispatcher.stop_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.stop();
    });
    let mut handler = |_: &[u8]| {};

    let state = timeout(Duration::from_secs(5), dispatcher.run(&mut handler))
        .await
        .expect("stop ends the loop");

    assert_eq!(state, LoopState::Stopped);
}

#[tokio::test]
async fn shutdown_closes_transport() {
    let dispatcher = Dispatcher::new(
        ScriptedTransport::default(),
        Pipeline::new(IpcMode::Sink, None),
        Duration::from_millis(10),
    );
    let handle = dispatcher.stop_handle();

    dispatcher.shutdown().await.expect("close succeeds");

    assert!(handle.is_stopped());
}

#[test]
fn from_config_rejects_invalid_configuration() {
    let config = ReceiverConfig {
        ipc: IpcMode::Rpc,
        parser: Some(SinkParser::Syslog),
        ..ReceiverConfig::default()
    };

    let result = Dispatcher::from_config(ScriptedTransport::default(), &config);

    assert!(matches!(
        result,
        Err(StartupError::Config(ConfigError::ParserRequiresSink {
            parser: SinkParser::Syslog,
            ipc: IpcMode::Rpc,
        }))
    ));
}

#[test]
fn consumer_stats_tolerate_missing_fields() {
    let stats = ConsumerStats::from_json(r#"{"name": "rdkafka#consumer-1"}"#).expect("object");
    assert_eq!(stats, ConsumerStats::default());
}

#[rstest]
#[case(0, "0 B")]
#[case(1023, "1023 B")]
#[case(1024, "1.0 KiB")]
#[case(1_572_864, "1.5 MiB")]
#[case(u64::MAX, "16.0 EiB")]
fn byte_count_uses_binary_units(#[case] bytes: u64, #[case] expected: &str) {
    assert_eq!(byte_count(bytes), expected);
}
