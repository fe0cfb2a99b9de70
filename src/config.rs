//! Receiver configuration.
//!
//! Configuration is assembled once, validated by
//! [`ReceiverConfig::validate`] and then frozen. Nothing here is consulted
//! per message, so an invalid setting can only ever fail startup.

use std::{collections::BTreeMap, time::Duration};

use log::warn;
use thiserror::Error;

use crate::{fragment::IpcMode, parser::SinkParser};

/// Default time a single poll may block waiting for the transport.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors raised while validating configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The IPC API name is neither `sink` nor `rpc`.
    #[error("invalid IPC {0}; expected 'sink' or 'rpc'")]
    InvalidIpc(String),
    /// The parser name is not one of `syslog`, `snmp` or `netflow`.
    #[error("invalid parser {0}; expected 'syslog', 'snmp' or 'netflow'")]
    InvalidParser(String),
    /// A Sink document parser was requested for a non-Sink topic.
    #[error("the {parser} parser requires the sink IPC API, not {ipc}")]
    ParserRequiresSink {
        /// Parser that was requested.
        parser: SinkParser,
        /// IPC API that was configured.
        ipc: IpcMode,
    },
    /// No topic was configured.
    #[error("a topic is required")]
    MissingTopic,
    /// The poll timeout is zero.
    #[error("poll timeout must be greater than zero")]
    ZeroPollTimeout,
}

/// Consumer settings handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bootstrap servers of the broker cluster.
    pub bootstrap: String,
    /// Topic carrying the IPC messages.
    pub topic: String,
    /// Consumer group identity.
    pub group_id: String,
    /// Additional consumer properties, applied after the defaults.
    pub parameters: Vec<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bootstrap: "localhost:9092".to_owned(),
            topic: "OpenNMS.Sink.Trap".to_owned(),
            group_id: "sink-go-client".to_owned(),
            parameters: Vec::new(),
        }
    }
}

impl TransportConfig {
    /// Build the consumer property map.
    ///
    /// Defaults are written first so `key=value` parameters can override
    /// them. Entries that are not a single `key=value` pair are logged and
    /// skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use sink_receiver::config::TransportConfig;
    ///
    /// let config = TransportConfig {
    ///     parameters: vec!["acks=1".into(), "session.timeout.ms=10000".into()],
    ///     ..TransportConfig::default()
    /// };
    /// let properties = config.consumer_properties();
    /// assert_eq!(properties["acks"], "1");
    /// assert_eq!(properties["session.timeout.ms"], "10000");
    /// ```
    #[must_use]
    pub fn consumer_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::from([
            ("bootstrap.servers".to_owned(), self.bootstrap.clone()),
            ("group.id".to_owned(), self.group_id.clone()),
            ("session.timeout.ms".to_owned(), "6000".to_owned()),
            ("broker.address.family".to_owned(), "v4".to_owned()),
        ]);
        for parameter in &self.parameters {
            let mut parts = parameter.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) if !key.is_empty() => {
                    properties.insert(key.to_owned(), value.to_owned());
                }
                _ => warn!("invalid key-value pair {parameter}"),
            }
        }
        properties
    }
}

/// Complete receiver configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// IPC API whose envelope wraps each fragment.
    pub ipc: IpcMode,
    /// Parser applied to completed Sink payloads; `None` forwards them
    /// verbatim.
    pub parser: Option<SinkParser>,
    /// Upper bound on a single transport poll.
    pub poll_timeout: Duration,
    /// Consumer settings.
    pub transport: TransportConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            ipc: IpcMode::default(),
            parser: None,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            transport: TransportConfig::default(),
        }
    }
}

impl ReceiverConfig {
    /// Check the configuration before any transport is created.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParserRequiresSink`] when a parser is combined
    /// with the RPC API, [`ConfigError::MissingTopic`] for an empty
    /// topic and [`ConfigError::ZeroPollTimeout`] for a zero poll timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(parser) = self.parser.filter(|_| self.ipc != IpcMode::Sink) {
            return Err(ConfigError::ParserRequiresSink {
                parser,
                ipc: self.ipc,
            });
        }
        if self.transport.topic.trim().is_empty() {
            return Err(ConfigError::MissingTopic);
        }
        if self.poll_timeout.is_zero() {
            return Err(ConfigError::ZeroPollTimeout);
        }
        Ok(())
    }
}
