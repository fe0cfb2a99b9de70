//! Reassembly behaviour through the public pipeline.
//!
//! Fragments are built as encoded envelopes so every test also exercises
//! chunk index normalisation.

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use sink_receiver::{
    DecodeError,
    IpcMode,
    LockedAccumulator,
    MessageId,
    Pipeline,
    ReassemblyTable,
};
use sink_receiver_testing::{rpc_chunks, sink_chunk, sink_chunks};

#[fixture]
#[allow(unused_braces, reason = "rustc false positive for single line rstest fixtures")]
fn pipeline() -> Pipeline { Pipeline::new(IpcMode::Sink, None) }

fn feed(pipeline: &Pipeline, envelopes: &[Vec<u8>]) -> Vec<Bytes> {
    envelopes
        .iter()
        .filter_map(|envelope| pipeline.process(envelope).expect("valid envelope"))
        .flatten()
        .collect()
}

#[rstest]
#[case::single(b"hello".as_slice(), 16)]
#[case::even_split(b"ABCDEF".as_slice(), 2)]
#[case::uneven_split(b"ABCDEFG".as_slice(), 3)]
#[case::byte_per_chunk(b"0123456789".as_slice(), 1)]
#[case::empty(b"".as_slice(), 4)]
fn in_order_delivery_releases_the_payload_once(
    pipeline: Pipeline,
    #[case] payload: &[u8],
    #[case] chunk_size: usize,
) {
    let released = feed(&pipeline, &sink_chunks("m", payload, chunk_size));

    assert_eq!(released, [Bytes::copy_from_slice(payload)]);
    assert_eq!(pipeline.table().in_flight(), 0);
}

#[rstest]
fn redelivered_prefix_is_ignored(pipeline: Pipeline) {
    let chunks = sink_chunks("m", b"ABCDEF", 2);
    let replayed = [
        chunks[0].clone(),
        chunks[0].clone(),
        chunks[1].clone(),
        chunks[0].clone(),
        chunks[1].clone(),
        chunks[2].clone(),
    ];

    assert_eq!(feed(&pipeline, &replayed), [Bytes::from_static(b"ABCDEF")]);
}

#[rstest]
fn overtaking_chunk_drops_its_predecessor(pipeline: Pipeline) {
    let released = feed(
        &pipeline,
        &[
            sink_chunk("m", 0, 4, b"A"),
            sink_chunk("m", 2, 4, b"C"),
            sink_chunk("m", 1, 4, b"B"),
            sink_chunk("m", 3, 4, b"D"),
        ],
    );

    assert_eq!(released, [Bytes::from_static(b"ACD")]);
}

#[rstest]
fn interleaved_messages_are_kept_apart(pipeline: Pipeline) {
    let first = sink_chunks("first", b"aaaabbbb", 4);
    let second = sink_chunks("second", b"xxxxyyyy", 4);
    let released = feed(
        &pipeline,
        &[
            first[0].clone(),
            second[0].clone(),
            second[1].clone(),
            first[1].clone(),
        ],
    );

    assert_eq!(
        released,
        [
            Bytes::from_static(b"xxxxyyyy"),
            Bytes::from_static(b"aaaabbbb")
        ]
    );
    assert_eq!(pipeline.table().in_flight(), 0);
}

#[rstest]
fn incomplete_message_stays_in_flight(pipeline: Pipeline) {
    let chunks = sink_chunks("partial", b"ABCDEF", 2);

    assert!(feed(&pipeline, &chunks[..2]).is_empty());
    assert_eq!(pipeline.table().in_flight(), 1);
    assert!(pipeline.table().contains(&MessageId::new("partial")));
}

#[rstest]
fn identity_is_reusable_after_completion(pipeline: Pipeline) {
    let mut envelopes = sink_chunks("reused", b"first", 3);
    envelopes.extend(sink_chunks("reused", b"second", 3));

    assert_eq!(
        feed(&pipeline, &envelopes),
        [Bytes::from_static(b"first"), Bytes::from_static(b"second")]
    );
}

#[test]
fn rpc_mode_reassembles_rpc_envelopes() {
    let pipeline = Pipeline::new(IpcMode::Rpc, None);

    let released = feed(&pipeline, &rpc_chunks("rpc-7", b"detect this", 4));

    assert_eq!(released, [Bytes::from_static(b"detect this")]);
}

#[rstest]
#[case::beyond_total(sink_chunk("m", 3, 3, b"x"))]
#[case::negative(sink_chunk("m", -2, 3, b"x"))]
#[case::zero_total(sink_chunk("m", 0, 0, b"x"))]
fn chunk_outside_the_message_is_rejected(pipeline: Pipeline, #[case] envelope: Vec<u8>) {
    let err = pipeline.process(&envelope).expect_err("out of range");

    assert!(matches!(err, DecodeError::ChunkOutOfRange { .. }));
    assert_eq!(pipeline.table().in_flight(), 0);
}

#[test]
fn pipelines_can_share_one_table() {
    let table = Arc::new(ReassemblyTable::new(LockedAccumulator::default()));
    let sink = Pipeline::with_table(IpcMode::Sink, None, Arc::clone(&table));
    let other = Pipeline::with_table(IpcMode::Sink, None, Arc::clone(&table));
    let chunks = sink_chunks("shared", b"ABCD", 2);

    assert_eq!(sink.process(&chunks[0]).expect("valid envelope"), None);
    assert_eq!(table.in_flight(), 1);
    assert_eq!(
        other.process(&chunks[1]).expect("valid envelope"),
        Some(vec![Bytes::from_static(b"ABCD")])
    );
    assert_eq!(table.in_flight(), 0);
}

/// Interleave redeliveries of already seen non-final chunks into an
/// in-order stream. Each seed picks the chunk after which a copy is sent and
/// which earlier chunk is copied.
fn with_redeliveries(chunks: &[Vec<u8>], seeds: &[u16]) -> Vec<Vec<u8>> {
    let non_final = chunks.len() - 1;
    let mut stream = Vec::new();
    for (position, chunk) in chunks.iter().enumerate() {
        stream.push(chunk.clone());
        if position == non_final {
            break;
        }
        for seed in seeds {
            let seed = usize::from(*seed);
            if seed % non_final == position {
                stream.push(chunks[seed / non_final % (position + 1)].clone());
            }
        }
    }
    stream
}

proptest! {
    #[test]
    fn redelivery_never_changes_the_result(
        payload in proptest::collection::vec(any::<u8>(), 0..128),
        chunk_size in 1_usize..16,
        seeds in proptest::collection::vec(any::<u16>(), 0..24),
    ) {
        let pipeline = Pipeline::new(IpcMode::Sink, None);
        let chunks = sink_chunks("prop", &payload, chunk_size);
        let stream = if chunks.len() > 1 {
            with_redeliveries(&chunks, &seeds)
        } else {
            chunks
        };

        let released = feed(&pipeline, &stream);

        prop_assert_eq!(released, vec![Bytes::from(payload)]);
        prop_assert_eq!(pipeline.table().in_flight(), 0);
    }
}
