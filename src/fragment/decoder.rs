//! Envelope decoding for the two supported IPC APIs.
//!
//! The format is fixed at startup and never inferred from the bytes: a
//! payload that does not parse as the configured envelope is a
//! [`DecodeError`], even if it would parse as the other one.

use std::{fmt, str::FromStr};

use bytes::Bytes;
use prost::Message as _;

use super::{Fragment, MessageId};
use crate::{
    config::ConfigError,
    error::DecodeError,
    proto::{RpcMessageProto, SinkMessage},
};

/// IPC API whose envelope carries the fragments on the subscribed topic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IpcMode {
    /// Sink API messages ([`SinkMessage`]).
    #[default]
    Sink,
    /// RPC API messages ([`RpcMessageProto`]).
    Rpc,
}

impl IpcMode {
    /// Name used on the command line and in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sink => "sink",
            Self::Rpc => "rpc",
        }
    }

    /// Decode a raw transport payload into a normalised [`Fragment`].
    ///
    /// The zero-based chunk number carried on the wire becomes the one-based
    /// [`Fragment::chunk_index`].
    ///
    /// # Examples
    ///
    /// ```
    /// use prost::Message;
    /// use sink_receiver::{fragment::IpcMode, proto::SinkMessage};
    ///
    /// let wire = SinkMessage {
    ///     message_id: "m1".into(),
    ///     content: b"hello".to_vec(),
    ///     current_chunk_number: Some(0),
    ///     total_chunks: Some(1),
    ///     ..SinkMessage::default()
    /// }
    /// .encode_to_vec();
    /// let fragment = IpcMode::Sink.decode(&wire).expect("valid sink message");
    /// assert_eq!(fragment.chunk_index(), 1);
    /// assert!(fragment.is_final());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Envelope`] when the bytes are not a valid
    /// envelope of this format, [`DecodeError::MissingIdentity`] when the
    /// identity is empty and [`DecodeError::ChunkOutOfRange`] when the chunk
    /// ordinal does not fit within the declared total.
    pub fn decode(self, bytes: &[u8]) -> Result<Fragment, DecodeError> {
        let (id, current, total, content) = match self {
            Self::Sink => {
                let message = SinkMessage::decode(bytes).map_err(|source| {
                    DecodeError::Envelope {
                        format: self.as_str(),
                        source,
                    }
                })?;
                (
                    message.message_id,
                    message.current_chunk_number.unwrap_or_default(),
                    message.total_chunks.unwrap_or_default(),
                    message.content,
                )
            }
            Self::Rpc => {
                let message = RpcMessageProto::decode(bytes).map_err(|source| {
                    DecodeError::Envelope {
                        format: self.as_str(),
                        source,
                    }
                })?;
                (
                    message.rpc_id,
                    message.current_chunk_number.unwrap_or_default(),
                    message.total_chunks.unwrap_or_default(),
                    message.rpc_content,
                )
            }
        };
        normalise(self, id, current, total, content)
    }
}

fn normalise(
    mode: IpcMode,
    id: String,
    current: i32,
    total: i32,
    content: Vec<u8>,
) -> Result<Fragment, DecodeError> {
    if id.is_empty() {
        return Err(DecodeError::MissingIdentity {
            format: mode.as_str(),
        });
    }
    let message_id = MessageId::from(id);
    let chunk = current.saturating_add(1);
    if chunk < 1 || chunk > total {
        return Err(DecodeError::ChunkOutOfRange {
            message_id,
            chunk,
            total,
        });
    }
    Ok(Fragment::new(message_id, chunk, total, Bytes::from(content)))
}

impl fmt::Display for IpcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for IpcMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sink" => Ok(Self::Sink),
            "rpc" => Ok(Self::Rpc),
            other => Err(ConfigError::InvalidIpc(other.to_owned())),
        }
    }
}
