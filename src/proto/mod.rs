//! Protobuf schemas carried on the IPC topics.
//!
//! The messages are declared with `prost` derive macros instead of generated
//! code so the crate builds without `protoc`. Field tags and labels follow the
//! published `.proto` definitions exactly; changing either breaks wire
//! compatibility with the producers.

pub mod netflow;
pub mod rpc;
pub mod sink;
pub mod telemetry;

pub use netflow::{Direction, FlowMessage, NetflowVersion, SamplingAlgorithm};
pub use rpc::RpcMessageProto;
pub use sink::SinkMessage;
pub use telemetry::{TelemetryMessage, TelemetryMessageLog};
