//! Metric helpers for `sink-receiver`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. Without the
//! `metrics` feature the helpers compile to no-ops.

/// Name of the counter tracking fragments pulled from the transport.
pub const CHUNKS_PROCESSED: &str = "sink_receiver_chunks_processed_total";
/// Name of the counter tracking completed logical messages.
pub const MESSAGES_PROCESSED: &str = "sink_receiver_messages_processed_total";
/// Name of the counter tracking fragments discarded as already seen.
pub const STALE_CHUNKS: &str = "sink_receiver_stale_chunks_total";
/// Name of the counter tracking payloads that failed to decode.
pub const DECODE_ERRORS: &str = "sink_receiver_decode_errors_total";
/// Name of the gauge tracking messages awaiting their final fragment.
pub const MESSAGES_IN_FLIGHT: &str = "sink_receiver_messages_in_flight";

/// Stage at which a payload failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStage {
    /// The IPC envelope around a fragment.
    Envelope,
    /// The completed payload handed to a Sink parser.
    Payload,
}

impl DecodeStage {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            DecodeStage::Envelope => "envelope",
            DecodeStage::Payload => "payload",
        }
    }
}

/// Record a fragment pulled from the transport.
pub fn inc_chunks() {
    #[cfg(feature = "metrics")]
    metrics::counter!(CHUNKS_PROCESSED).increment(1);
}

/// Record a completed logical message.
pub fn inc_messages() {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_PROCESSED).increment(1);
}

/// Record a fragment discarded by duplicate suppression.
pub fn inc_stale() {
    #[cfg(feature = "metrics")]
    metrics::counter!(STALE_CHUNKS).increment(1);
}

/// Record a decoding failure at the given stage.
#[cfg_attr(not(feature = "metrics"), allow(unused_variables))]
pub fn inc_decode_errors(stage: DecodeStage) {
    #[cfg(feature = "metrics")]
    metrics::counter!(DECODE_ERRORS, "stage" => stage.as_str()).increment(1);
}

/// Publish the number of in-flight messages.
#[cfg_attr(not(feature = "metrics"), allow(unused_variables))]
pub fn set_in_flight(count: usize) {
    #[cfg(feature = "metrics")]
    {
        #[expect(
            clippy::cast_precision_loss,
            reason = "gauge values are f64; in-flight counts stay far below 2^52"
        )]
        let value = count as f64;
        metrics::gauge!(MESSAGES_IN_FLIGHT).set(value);
    }
}
