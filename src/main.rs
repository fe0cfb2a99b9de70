//! `sink-receiver` binary.
//!
//! Replays a capture of topic records through the reassembly pipeline and
//! logs every completed payload, parsed first when `--parser` is given.
//! Stops on Ctrl+C, SIGTERM or at the end of the capture.

mod cli;

use std::{future, process::ExitCode, time::Duration};

use clap::Parser;
use log::{error, info, warn};
use sink_receiver::{
    Dispatcher,
    ReceiverConfig,
    ReplayTransport,
    StartupError,
    StopHandle,
    TransportConfig,
    config::ConfigError,
};
use tokio::{
    fs::File,
    io::{self, AsyncRead},
    select,
    signal,
};

fn build_config(cli: &cli::Cli) -> Result<ReceiverConfig, ConfigError> {
    Ok(ReceiverConfig {
        ipc: cli.ipc.parse()?,
        parser: cli.parser.as_deref().map(str::parse).transpose()?,
        poll_timeout: Duration::from_millis(cli.poll_timeout_ms),
        transport: TransportConfig {
            bootstrap: cli.bootstrap.clone(),
            topic: cli.topic.clone(),
            group_id: cli.group_id.clone(),
            parameters: cli.parameters.clone(),
        },
    })
}

#[cfg(feature = "metrics")]
fn install_metrics(port: u16) -> Result<(), StartupError> {
    info!("starting Prometheus metrics server on port {port}");
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|err| StartupError::Metrics(err.to_string()))
}

#[cfg(not(feature = "metrics"))]
fn install_metrics(_port: u16) -> Result<(), StartupError> { Ok(()) }

async fn open_input(cli: &cli::Cli) -> Result<Box<dyn AsyncRead + Unpin + Send>, StartupError> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .await
                .map_err(|err| StartupError::Subscribe(err.into()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM.
///
/// Returns `false` if Ctrl+C cannot be listened for.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! expands to modulus internally"
)]
async fn shutdown_signal() -> bool {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("cannot listen for SIGTERM: {err}");
                future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    select! {
        result = signal::ctrl_c() => result.is_ok(),
        () = terminate => true,
    }
}

/// Stop the loop once `signal` reports a shutdown request.
async fn stop_on(signal: impl Future<Output = bool>, stop: StopHandle) {
    if signal.await {
        info!("shutdown signal received");
        stop.stop();
    }
}

async fn run(cli: cli::Cli) -> Result<(), StartupError> {
    let config = build_config(&cli)?;
    config.validate()?;
    info!(
        "creating consumer for topic {} at {} with properties {:?}",
        config.transport.topic,
        config.transport.bootstrap,
        config.transport.consumer_properties()
    );

    let reader = open_input(&cli).await?;
    let transport = ReplayTransport::new(reader, config.transport.topic.clone());
    let mut dispatcher = Dispatcher::from_config(transport, &config)?;
    install_metrics(cli.metrics_port)?;

    tokio::spawn(stop_on(shutdown_signal(), dispatcher.stop_handle()));

    let mut handler = |payload: &[u8]| {
        info!("message: {}", String::from_utf8_lossy(payload));
    };
    dispatcher.run(&mut handler).await;

    if let Err(err) = dispatcher.shutdown().await {
        error!("error closing consumer: {err}");
    }
    info!("good bye!");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("cannot initialize consumer: {err}");
            ExitCode::FAILURE
        }
    }
}
