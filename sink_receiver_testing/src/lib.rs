//! Test support for `sink-receiver`.
//!
//! Builders for wire envelopes, an in-memory [`ScriptedTransport`], capture
//! encoding for [`ReplayTransport`](sink_receiver::ReplayTransport) and a
//! serialised log capture fixture.
//!
//! ```rust
//! use sink_receiver::IpcMode;
//! use sink_receiver_testing::sink_chunks;
//!
//! let chunks = sink_chunks("m1", b"ABCDEF", 2);
//! assert_eq!(chunks.len(), 3);
//! let first = IpcMode::Sink.decode(&chunks[0]).expect("valid chunk");
//! assert_eq!(first.chunk_index(), 1);
//! ```

pub mod capture;
pub mod envelopes;
pub mod logging;
pub mod transport;

pub use capture::encode_capture;
pub use envelopes::{
    flow,
    rpc_chunk,
    rpc_chunks,
    sink_chunk,
    sink_chunks,
    telemetry_envelope,
};
pub use logging::{LoggerHandle, logger};
pub use transport::{CommitLog, ScriptedTransport, fragment_event};
