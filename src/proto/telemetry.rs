//! Outer telemetry envelope wrapping raw protocol records.

/// One raw telemetry record as captured by the listener.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TelemetryMessage {
    /// Capture time in milliseconds since the Unix epoch.
    #[prost(uint64, required, tag = "1")]
    pub timestamp: u64,
    /// Encoded inner record.
    #[prost(bytes = "vec", required, tag = "2")]
    pub bytes: Vec<u8>,
}

/// Batch of telemetry records received from a single exporter.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TelemetryMessageLog {
    #[prost(string, required, tag = "1")]
    pub location: String,
    #[prost(string, required, tag = "2")]
    pub system_id: String,
    #[prost(string, optional, tag = "3")]
    pub source_address: Option<String>,
    #[prost(uint32, optional, tag = "4")]
    pub source_port: Option<u32>,
    /// Records in the order the exporter sent them.
    #[prost(message, repeated, tag = "5")]
    pub message: Vec<TelemetryMessage>,
}
