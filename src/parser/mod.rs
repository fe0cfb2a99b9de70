//! Second-stage parsers for completed Sink payloads.
//!
//! Each Sink module publishes its own document inside the IPC envelope:
//! syslog and SNMP trap listeners send XML logs, telemetry listeners send
//! protobuf batches of flows. [`SinkParser`] picks the format at startup and
//! turns a completed payload into indented JSON. Parsing is all or nothing:
//! a document that fails anywhere yields an error and no output.

mod snmp;
mod syslog;

use std::{fmt, io::BufRead, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use log::info;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};

pub use snmp::{SnmpResult, SnmpResults, SnmpValue, Trap, TrapIdentity, TrapLog};
pub use syslog::{SyslogMessage, SyslogMessageLog};

use crate::{config::ConfigError, error::DecodeError, telemetry};

/// Format of the documents carried by a Sink topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkParser {
    /// `syslog-message-log` XML from the syslog listener.
    Syslog,
    /// `trap-message-log` XML from the SNMP trap listener.
    Snmp,
    /// Protobuf telemetry batches of netflow records.
    Netflow,
}

impl SinkParser {
    /// Name used on the command line and in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syslog => "syslog",
            Self::Snmp => "snmp",
            Self::Netflow => "netflow",
        }
    }

    /// Parse a completed payload into the units handed to the handler.
    ///
    /// XML logs produce a single JSON document. A telemetry batch produces
    /// one document per flow, in envelope order, and none for an empty
    /// batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use sink_receiver::parser::SinkParser;
    ///
    /// let xml = br#"<syslog-message-log system-id="minion-1" location="Default"
    ///     source-address="192.0.2.5" source-port="514">
    ///     <messages timestamp="2020-05-01T12:00:00Z">aGVsbG8=</messages>
    /// </syslog-message-log>"#;
    /// let units = SinkParser::Syslog.parse(xml).expect("valid log");
    /// let json: serde_json::Value = serde_json::from_slice(&units[0]).expect("JSON");
    /// assert_eq!(json["messages"][0]["content"], "hello");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Xml`] for an XML log that does not parse or
    /// carries invalid base64 content, [`DecodeError::Telemetry`] or
    /// [`DecodeError::Flow`] for a bad telemetry batch and
    /// [`DecodeError::Render`] if the JSON cannot be produced.
    pub fn parse(self, payload: &[u8]) -> Result<Vec<Bytes>, DecodeError> {
        match self {
            Self::Syslog => {
                let log: SyslogMessageLog = from_xml(self, payload)?;
                info!(
                    "processing syslog log with {} messages from {} at {}",
                    log.messages.len(),
                    log.system_id,
                    log.location
                );
                Ok(vec![to_json(&log)?])
            }
            Self::Snmp => {
                let log: TrapLog = from_xml(self, payload)?;
                info!(
                    "processing trap log with {} traps from {} at {}",
                    log.messages.len(),
                    log.system_id,
                    log.location
                );
                Ok(vec![to_json(&log)?])
            }
            Self::Netflow => {
                let batch = telemetry::unwrap_flows(payload)?;
                info!(
                    "processing telemetry message with {} records from {} at {}",
                    batch.len(),
                    batch.system_id(),
                    batch.location()
                );
                batch.render()
            }
        }
    }
}

impl fmt::Display for SinkParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SinkParser {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "syslog" => Ok(Self::Syslog),
            "snmp" => Ok(Self::Snmp),
            "netflow" => Ok(Self::Netflow),
            other => Err(ConfigError::InvalidParser(other.to_owned())),
        }
    }
}

fn from_xml<T: DeserializeOwned>(
    parser: SinkParser,
    payload: impl BufRead,
) -> Result<T, DecodeError> {
    quick_xml::de::from_reader(payload).map_err(|source| DecodeError::Xml {
        format: parser.as_str(),
        source,
    })
}

fn to_json<T: serde::Serialize>(document: &T) -> Result<Bytes, DecodeError> {
    Ok(Bytes::from(serde_json::to_vec_pretty(document)?))
}

/// Decode base64 element text into a string.
///
/// Listeners base64-encode free text so it survives XML escaping; bytes that
/// are not UTF-8 are replaced rather than rejected.
fn base64_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = String::deserialize(deserializer)?;
    let cleaned: String = text.split_whitespace().collect();
    let bytes = STANDARD
        .decode(cleaned)
        .map_err(|err| serde::de::Error::custom(format!("invalid base64 content: {err}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
