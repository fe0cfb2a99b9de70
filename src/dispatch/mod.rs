//! The poll, process and commit loop.
//!
//! [`Dispatcher`] pulls one [`Event`] at a time from a [`Transport`], feeds
//! fragments through the [`Pipeline`] and hands every completed payload to a
//! [`PayloadHandler`]. Handler calls are sequential with polling, so stopping
//! after the current iteration never interrupts a handler.

mod dispatcher;
mod handler;
mod pipeline;
mod stats;
mod transport;

pub use dispatcher::{Dispatcher, LoopState, StopHandle};
pub use handler::PayloadHandler;
pub use pipeline::Pipeline;
pub use stats::{ConsumerStats, byte_count};
pub use transport::{Event, Record, Transport, TransportError};

#[cfg(test)]
mod tests;
