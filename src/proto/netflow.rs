//! Flow document emitted by the telemetry adapters.
//!
//! Every flow protocol (`NetFlow` v5/v9, IPFIX, `sFlow`) is normalised into the
//! same [`FlowMessage`]. Optional counters use the protobuf wrapper types,
//! which `prost` maps onto `Option<primitive>`, so an absent value and a zero
//! value stay distinguishable after decoding.
//!
//! The message also derives [`serde::Serialize`] so decoded flows can be
//! handed onwards as JSON. Field names stay in `snake_case` to match the
//! protobuf JSON tags and enums render by their protobuf names.

use serde::{Serialize, Serializer};

/// Traffic direction relative to the exporting interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Direction {
    Ingress = 0,
    Egress = 1,
    Unknown = 255,
}

impl Direction {
    /// Protobuf name of the variant.
    #[must_use]
    pub const fn as_str_name(self) -> &'static str {
        match self {
            Self::Ingress => "INGRESS",
            Self::Egress => "EGRESS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Sampling algorithm announced by the exporter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum SamplingAlgorithm {
    Unassigned = 0,
    SystematicCountBasedSampling = 1,
    SystematicTimeBasedSampling = 2,
    RandomNOutOfNSampling = 3,
    UniformProbabilisticSampling = 4,
    PropertyMatchFiltering = 5,
    HashBasedFiltering = 6,
    FlowStateDependentIntermediateFlowSelectionProcess = 7,
}

impl SamplingAlgorithm {
    /// Protobuf name of the variant.
    #[must_use]
    pub const fn as_str_name(self) -> &'static str {
        match self {
            Self::Unassigned => "UNASSIGNED",
            Self::SystematicCountBasedSampling => "SYSTEMATIC_COUNT_BASED_SAMPLING",
            Self::SystematicTimeBasedSampling => "SYSTEMATIC_TIME_BASED_SAMPLING",
            Self::RandomNOutOfNSampling => "RANDOM_N_OUT_OF_N_SAMPLING",
            Self::UniformProbabilisticSampling => "UNIFORM_PROBABILISTIC_SAMPLING",
            Self::PropertyMatchFiltering => "PROPERTY_MATCH_FILTERING",
            Self::HashBasedFiltering => "HASH_BASED_FILTERING",
            Self::FlowStateDependentIntermediateFlowSelectionProcess => {
                "FLOW_STATE_DEPENDENT_INTERMEDIATE_FLOW_SELECTION_PROCESS"
            }
        }
    }
}

/// Flow protocol that produced the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum NetflowVersion {
    V5 = 0,
    V9 = 1,
    Ipfix = 2,
    Sflow = 3,
}

impl NetflowVersion {
    /// Protobuf name of the variant.
    #[must_use]
    pub const fn as_str_name(self) -> &'static str {
        match self {
            Self::V5 => "V5",
            Self::V9 => "V9",
            Self::Ipfix => "IPFIX",
            Self::Sflow => "SFLOW",
        }
    }
}

/// A single normalised flow.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct FlowMessage {
    /// Flow timestamp in milliseconds since the Unix epoch.
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_bytes: Option<u64>,
    #[prost(enumeration = "Direction", tag = "3")]
    #[serde(serialize_with = "direction_name")]
    pub direction: i32,
    #[prost(string, tag = "4")]
    pub dst_address: String,
    #[prost(message, optional, tag = "5")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_hostname: Option<String>,
    #[prost(message, optional, tag = "6")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_as: Option<u64>,
    #[prost(message, optional, tag = "7")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_mask_len: Option<u32>,
    #[prost(message, optional, tag = "8")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<u32>,
    #[prost(message, optional, tag = "9")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<u32>,
    #[prost(message, optional, tag = "10")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<u32>,
    #[prost(message, optional, tag = "11")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_switched: Option<u64>,
    #[prost(message, optional, tag = "12")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_switched: Option<u64>,
    #[prost(message, optional, tag = "13")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_switched: Option<u64>,
    #[prost(message, optional, tag = "14")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_flow_records: Option<u32>,
    #[prost(message, optional, tag = "15")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_packets: Option<u64>,
    #[prost(message, optional, tag = "16")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_seq_num: Option<u32>,
    #[prost(message, optional, tag = "17")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_snmp_ifindex: Option<u32>,
    #[prost(message, optional, tag = "18")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_snmp_ifindex: Option<u32>,
    #[prost(message, optional, tag = "19")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_protocol_version: Option<u32>,
    #[prost(string, tag = "20")]
    pub next_hop_address: String,
    #[prost(message, optional, tag = "21")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_hostname: Option<String>,
    #[prost(message, optional, tag = "22")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<u32>,
    #[prost(enumeration = "SamplingAlgorithm", tag = "23")]
    #[serde(serialize_with = "sampling_algorithm_name")]
    pub sampling_algorithm: i32,
    #[prost(message, optional, tag = "24")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_interval: Option<f64>,
    #[prost(string, tag = "26")]
    pub src_address: String,
    #[prost(message, optional, tag = "27")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_hostname: Option<String>,
    #[prost(message, optional, tag = "28")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_as: Option<u64>,
    #[prost(message, optional, tag = "29")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_mask_len: Option<u32>,
    #[prost(message, optional, tag = "30")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u32>,
    #[prost(message, optional, tag = "31")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_flags: Option<u32>,
    #[prost(message, optional, tag = "32")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tos: Option<u32>,
    #[prost(enumeration = "NetflowVersion", tag = "33")]
    #[serde(serialize_with = "netflow_version_name")]
    pub netflow_version: i32,
    #[prost(message, optional, tag = "34")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u32>,
    #[prost(string, tag = "35")]
    pub node_identifier: String,
}

// Unknown enum values are kept numeric rather than rejected; proto3 allows
// producers to send values newer than this schema.
#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes fields to serialize_with by reference"
)]
fn direction_name<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    match Direction::try_from(*value) {
        Ok(direction) => serializer.serialize_str(direction.as_str_name()),
        Err(_) => serializer.serialize_i32(*value),
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes fields to serialize_with by reference"
)]
fn sampling_algorithm_name<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    match SamplingAlgorithm::try_from(*value) {
        Ok(algorithm) => serializer.serialize_str(algorithm.as_str_name()),
        Err(_) => serializer.serialize_i32(*value),
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes fields to serialize_with by reference"
)]
fn netflow_version_name<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    match NetflowVersion::try_from(*value) {
        Ok(version) => serializer.serialize_str(version.as_str_name()),
        Err(_) => serializer.serialize_i32(*value),
    }
}
