//! Second-stage decoding of completed telemetry payloads.
//!
//! A completed Sink message in telemetry mode is a [`TelemetryMessageLog`]
//! whose records are themselves encoded [`FlowMessage`]s. Unwrapping is all
//! or nothing: if the envelope or any record fails to parse, or any record
//! fails to render, no record is handed on.

use bytes::Bytes;
use prost::Message as _;

use crate::{
    error::DecodeError,
    proto::{FlowMessage, TelemetryMessageLog},
};

/// One decoded flow together with the time the listener captured it.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowRecord {
    captured_at: u64,
    flow: FlowMessage,
}

impl FlowRecord {
    /// Capture timestamp from the envelope, in milliseconds since the epoch.
    #[must_use]
    pub const fn captured_at(&self) -> u64 { self.captured_at }

    /// Borrow the decoded flow.
    #[must_use]
    pub fn flow(&self) -> &FlowMessage { &self.flow }

    /// Render the flow as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Render`] if serialisation fails.
    pub fn to_json(&self) -> Result<Bytes, DecodeError> {
        Ok(Bytes::from(serde_json::to_vec_pretty(&self.flow)?))
    }
}

/// Decoded telemetry envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryBatch {
    location: String,
    system_id: String,
    source_address: Option<String>,
    source_port: Option<u32>,
    records: Vec<FlowRecord>,
}

impl TelemetryBatch {
    /// Monitoring location of the listener that captured the batch.
    #[must_use]
    pub fn location(&self) -> &str { &self.location }

    /// Identity of the system that forwarded the batch.
    #[must_use]
    pub fn system_id(&self) -> &str { &self.system_id }

    /// Exporter address, when the listener recorded it.
    #[must_use]
    pub fn source_address(&self) -> Option<&str> { self.source_address.as_deref() }

    /// Exporter port, when the listener recorded it.
    #[must_use]
    pub const fn source_port(&self) -> Option<u32> { self.source_port }

    /// Records in envelope order.
    #[must_use]
    pub fn records(&self) -> &[FlowRecord] { &self.records }

    /// Number of records in the batch.
    #[must_use]
    pub fn len(&self) -> usize { self.records.len() }

    /// Return `true` when the envelope carried no records.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Render every record as JSON, preserving envelope order.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError::Render`] encountered; no partial
    /// output is returned.
    pub fn render(&self) -> Result<Vec<Bytes>, DecodeError> {
        self.records.iter().map(FlowRecord::to_json).collect()
    }
}

/// Decode a completed payload as a telemetry envelope of flow records.
///
/// # Examples
///
/// ```
/// use prost::Message;
/// use sink_receiver::{
///     proto::{FlowMessage, TelemetryMessage, TelemetryMessageLog},
///     telemetry::unwrap_flows,
/// };
///
/// let flow = FlowMessage { src_address: "10.0.0.1".into(), ..FlowMessage::default() };
/// let envelope = TelemetryMessageLog {
///     location: "Default".into(),
///     system_id: "minion-1".into(),
///     message: vec![TelemetryMessage { timestamp: 1, bytes: flow.encode_to_vec() }],
///     ..TelemetryMessageLog::default()
/// };
/// let batch = unwrap_flows(&envelope.encode_to_vec()).expect("valid envelope");
/// assert_eq!(batch.len(), 1);
/// assert_eq!(batch.records()[0].flow().src_address, "10.0.0.1");
/// ```
///
/// # Errors
///
/// Returns [`DecodeError::Telemetry`] when the envelope does not parse and
/// [`DecodeError::Flow`] naming the first record that does not.
pub fn unwrap_flows(payload: &[u8]) -> Result<TelemetryBatch, DecodeError> {
    let envelope = TelemetryMessageLog::decode(payload).map_err(DecodeError::Telemetry)?;
    let records = envelope
        .message
        .iter()
        .enumerate()
        .map(|(position, message)| {
            FlowMessage::decode(message.bytes.as_slice())
                .map(|flow| FlowRecord {
                    captured_at: message.timestamp,
                    flow,
                })
                .map_err(|source| DecodeError::Flow { position, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TelemetryBatch {
        location: envelope.location,
        system_id: envelope.system_id,
        source_address: envelope.source_address,
        source_port: envelope.source_port,
        records,
    })
}

#[cfg(test)]
mod tests;
