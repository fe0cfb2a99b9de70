//! Canonical error types shared across the receiver.
//!
//! Decoding failures are per-message: the dispatch loop logs them, drops the
//! message and keeps polling. [`StartupError`] is the only error that stops
//! the receiver, and only before the loop has started.

use thiserror::Error;

use crate::{config::ConfigError, dispatch::TransportError, fragment::MessageId};

/// Errors raised while decoding an envelope or one of its inner records.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not parse as the configured IPC envelope.
    #[error("invalid {format} message received: {source}")]
    Envelope {
        /// Name of the envelope format that was attempted.
        format: &'static str,
        #[source]
        source: prost::DecodeError,
    },
    /// The envelope parsed but carries an empty identity.
    #[error("{format} message carries no identity")]
    MissingIdentity {
        /// Name of the envelope format.
        format: &'static str,
    },
    /// The normalised chunk ordinal falls outside `1..=total`.
    #[error("chunk {chunk} of {total} is out of range for message {message_id}")]
    ChunkOutOfRange {
        /// Message the chunk claims to belong to.
        message_id: MessageId,
        /// One-based chunk ordinal after normalisation.
        chunk: i32,
        /// Declared chunk count.
        total: i32,
    },
    /// The completed payload is not a telemetry envelope.
    #[error("invalid telemetry message received: {0}")]
    Telemetry(#[source] prost::DecodeError),
    /// An inner record of a telemetry envelope failed to parse.
    #[error("invalid netflow message at position {position}: {source}")]
    Flow {
        /// Zero-based position of the record within the envelope.
        position: usize,
        #[source]
        source: prost::DecodeError,
    },
    /// A Sink XML log did not parse, or one of its base64 fields did not
    /// decode.
    #[error("invalid {format} log received: {source}")]
    Xml {
        /// Name of the parser that rejected the document.
        format: &'static str,
        #[source]
        source: quick_xml::DeError,
    },
    /// A decoded record could not be rendered for the handler.
    #[error("cannot render flow record: {0}")]
    Render(#[from] serde_json::Error),
}

/// Errors that prevent the receiver from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configuration was rejected during validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The transport could not be created or subscribed.
    #[error("cannot subscribe: {0}")]
    Subscribe(#[from] TransportError),
    /// Installing the metrics exporter failed.
    #[error("cannot start metrics exporter: {0}")]
    Metrics(String),
}
