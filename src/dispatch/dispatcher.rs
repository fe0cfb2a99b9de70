//! Run control for the dispatch loop.

use std::time::Duration;

use log::{info, warn};
use tokio::select;
use tokio_util::sync::CancellationToken;

use super::{Event, PayloadHandler, Pipeline, Record, Transport, TransportError, stats};
use crate::{
    config::ReceiverConfig,
    error::StartupError,
    parser::SinkParser,
    reassembly::{KeyedAccumulator, ShardedAccumulator},
};

/// State of the dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Polling and processing events.
    Running,
    /// Stopped; no further polls will happen.
    Stopped,
}

/// Cloneable handle that stops a running [`Dispatcher`].
///
/// Stopping is cooperative: the loop finishes the event it is processing,
/// including every handler call for it, and returns before the next poll.
/// A pending poll is abandoned immediately.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(CancellationToken);

impl StopHandle {
    /// Request the loop to stop. Safe to call from any thread or task, any
    /// number of times.
    pub fn stop(&self) { self.0.cancel(); }

    /// Return `true` once a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool { self.0.is_cancelled() }
}

/// Drives a [`Transport`] through a [`Pipeline`].
pub struct Dispatcher<T, A = ShardedAccumulator> {
    transport: T,
    pipeline: Pipeline<A>,
    poll_timeout: Duration,
    stop: StopHandle,
}

impl<T: Transport> Dispatcher<T> {
    /// Validate `config` and build a dispatcher with a fresh reassembly
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Config`] if the configuration is invalid; the
    /// loop never starts in that case.
    pub fn from_config(transport: T, config: &ReceiverConfig) -> Result<Self, StartupError> {
        config.validate()?;
        Ok(Self::new(
            transport,
            Pipeline::new(config.ipc, config.parser),
            config.poll_timeout,
        ))
    }
}

impl<T: Transport, A: KeyedAccumulator> Dispatcher<T, A> {
    /// Build a dispatcher from an already assembled pipeline.
    #[must_use]
    pub fn new(transport: T, pipeline: Pipeline<A>, poll_timeout: Duration) -> Self {
        Self {
            transport,
            pipeline,
            poll_timeout,
            stop: StopHandle::default(),
        }
    }

    /// Return a handle that stops this dispatcher.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle { self.stop.clone() }

    /// Borrow the transport.
    #[must_use]
    pub fn transport(&self) -> &T { &self.transport }

    /// Borrow the pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<A> { &self.pipeline }

    /// Poll and process events until stopped or the transport closes.
    ///
    /// Every fragment is committed after processing whether or not it
    /// decoded; a malformed payload would fail the same way on redelivery.
    /// Transport errors other than [`TransportError::Closed`] are logged and
    /// polling continues.
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "tokio::select! expands to modulus internally"
    )]
    pub async fn run<H: PayloadHandler>(&mut self, handler: &mut H) -> LoopState {
        info!(
            "starting {} consumer (parser: {}, poll timeout: {:?})",
            self.pipeline.mode(),
            self.pipeline.parser().map_or("none", SinkParser::as_str),
            self.poll_timeout
        );
        let stop = self.stop.0.clone();
        let mut state = LoopState::Running;

        while state == LoopState::Running {
            if stop.is_cancelled() {
                state = LoopState::Stopped;
                continue;
            }
            let event = select! {
                biased;
                () = stop.cancelled() => None,
                event = self.transport.poll(self.poll_timeout) => event,
            };
            match event {
                None => {}
                Some(Event::Fragment(record)) => self.dispatch(&record, handler).await,
                Some(Event::Error(err)) if err.is_closed() => {
                    info!("transport closed");
                    state = LoopState::Stopped;
                }
                Some(Event::Error(err)) => warn!("consumer error {err}"),
                Some(Event::Stats(json)) => stats::log_statistics(&json),
            }
        }

        info!(
            "consumer stopped with {} incomplete messages",
            self.pipeline.table().in_flight()
        );
        state
    }

    /// Close the transport, consuming the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns any [`TransportError`] raised while closing.
    pub async fn shutdown(mut self) -> Result<(), TransportError> {
        info!("stopping consumer");
        self.stop.stop();
        self.transport.close().await
    }

    async fn dispatch<H: PayloadHandler>(&mut self, record: &Record, handler: &mut H) {
        match self.pipeline.process(&record.payload) {
            Ok(Some(units)) => {
                for unit in &units {
                    handler.handle(unit);
                }
            }
            Ok(None) => {}
            Err(err) => warn!("dropping payload from {record}: {err}"),
        }
        if let Err(err) = self.transport.commit(record).await {
            warn!("error committing {record}: {err}");
        }
    }
}
