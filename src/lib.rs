#![doc(html_root_url = "https://docs.rs/sink-receiver/latest")]
//! Public API for the `sink-receiver` library.
//!
//! This crate reassembles chunked IPC messages consumed from a topic. Each
//! fragment is decoded from its envelope, accumulated per message identity
//! and released exactly once when the final chunk arrives, optionally
//! parsed as a Sink document (syslog or SNMP trap log, telemetry flow
//! batch) into JSON.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fragment;
pub mod metrics;
pub mod parser;
pub mod proto;
pub mod reassembly;
pub mod replay;
pub mod telemetry;

pub use config::{ConfigError, ReceiverConfig, TransportConfig};
pub use dispatch::{
    Dispatcher,
    Event,
    LoopState,
    PayloadHandler,
    Pipeline,
    Record,
    StopHandle,
    Transport,
    TransportError,
};
pub use error::{DecodeError, StartupError};
pub use fragment::{Fragment, IpcMode, MessageId};
pub use parser::SinkParser;
pub use reassembly::{
    FragmentStatus,
    KeyedAccumulator,
    LockedAccumulator,
    ReassembledMessage,
    ReassemblyTable,
    ShardedAccumulator,
};
pub use replay::ReplayTransport;
pub use telemetry::{FlowRecord, TelemetryBatch, unwrap_flows};
