//! `trap-message-log` documents.
//!
//! Variable binding values and nothing else are base64 decoded; the raw PDU
//! is passed through in its encoded form.

use serde::{Deserialize, Serialize};

/// Batch of traps received by one listener.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrapLog {
    #[serde(rename(deserialize = "@location", serialize = "location"))]
    pub location: String,
    #[serde(rename(deserialize = "@system-id", serialize = "systemId"))]
    pub system_id: String,
    #[serde(
        rename(deserialize = "@trap-address", serialize = "trapAddress"),
        default
    )]
    pub trap_address: String,
    #[serde(default)]
    pub messages: Vec<Trap>,
}

/// A single SNMP trap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Trap {
    #[serde(rename(deserialize = "agent-address", serialize = "agentAddress"))]
    pub agent_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub community: String,
    pub version: String,
    pub timestamp: i64,
    #[serde(rename(deserialize = "creation-time", serialize = "creationTime"))]
    pub creation_time: i64,
    #[serde(rename(deserialize = "pdu-length", serialize = "pduLength"))]
    pub pdu_length: i32,
    #[serde(
        rename(deserialize = "raw-message", serialize = "rawMessage"),
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_message: Option<String>,
    #[serde(rename(deserialize = "trap-identity", serialize = "trapIdentity"))]
    pub trap_identity: Option<TrapIdentity>,
    pub results: Option<SnmpResults>,
}

/// Enterprise, generic and specific identity of a trap.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrapIdentity {
    #[serde(rename(deserialize = "@enterprise-id", serialize = "enterpriseID"))]
    pub enterprise_id: String,
    #[serde(rename(deserialize = "@generic", serialize = "generic"))]
    pub generic: i32,
    #[serde(rename(deserialize = "@specific", serialize = "specific"))]
    pub specific: i32,
}

/// Variable bindings carried by a trap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnmpResults {
    #[serde(rename(deserialize = "result", serialize = "results"), default)]
    pub results: Vec<SnmpResult>,
}

/// One variable binding.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnmpResult {
    pub base: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    pub value: SnmpValue,
}

/// Typed value of a variable binding.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnmpValue {
    #[serde(rename(deserialize = "@type", serialize = "type"))]
    pub r#type: i32,
    #[serde(
        rename(deserialize = "$text", serialize = "value"),
        deserialize_with = "super::base64_text",
        default
    )]
    pub value: String,
}
