//! `syslog-message-log` documents.

use serde::{Deserialize, Serialize};

/// Batch of syslog messages received by one listener.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyslogMessageLog {
    #[serde(rename(deserialize = "@system-id", serialize = "systemId"))]
    pub system_id: String,
    #[serde(rename(deserialize = "@location", serialize = "location"))]
    pub location: String,
    #[serde(
        rename(deserialize = "@source-address", serialize = "sourceAddress"),
        default
    )]
    pub source_address: String,
    #[serde(
        rename(deserialize = "@source-port", serialize = "sourcePort"),
        default
    )]
    pub source_port: u32,
    #[serde(default)]
    pub messages: Vec<SyslogMessage>,
}

/// One syslog line with the time the listener received it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyslogMessage {
    #[serde(rename(deserialize = "@timestamp", serialize = "timestamp"), default)]
    pub timestamp: String,
    #[serde(
        rename(deserialize = "$text", serialize = "content"),
        deserialize_with = "super::base64_text",
        default
    )]
    pub content: String,
}
