//! Command line interface for the `sink-receiver` binary.
//!
//! Kept free of library imports so the build script can include it to
//! render the manual page.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `sink-receiver` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sink-receiver",
    version,
    about = "Reassemble chunked Sink and RPC messages from a topic capture"
)]
pub struct Cli {
    /// Broker bootstrap servers.
    #[arg(long, default_value = "localhost:9092")]
    pub bootstrap: String,
    /// Topic that carries the messages.
    #[arg(long, default_value = "OpenNMS.Sink.Trap")]
    pub topic: String,
    /// Consumer group identity.
    #[arg(long = "group-id", default_value = "sink-go-client")]
    pub group_id: String,
    /// Consumer property as key=value; may be repeated.
    #[arg(long = "parameter", value_name = "KEY=VALUE")]
    pub parameters: Vec<String>,
    /// IPC API: sink or rpc.
    #[arg(long, default_value = "sink")]
    pub ipc: String,
    /// Sink API parser: syslog, snmp or netflow. Payloads are logged
    /// verbatim when omitted.
    #[arg(long)]
    pub parser: Option<String>,
    /// Maximum time a single poll waits for a record.
    #[arg(long = "poll-timeout-ms", default_value_t = 500)]
    pub poll_timeout_ms: u64,
    /// Capture of length-delimited records to replay; stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Port of the Prometheus metrics endpoint.
    #[arg(long = "metrics-port", default_value_t = 8181)]
    pub metrics_port: u16,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn defaults_match_sink_consumer() {
        let cli = Cli::parse_from(["sink-receiver"]);
        assert_eq!(cli.topic, "OpenNMS.Sink.Trap");
        assert_eq!(cli.ipc, "sink");
        assert_eq!(cli.poll_timeout_ms, 500);
        assert!(cli.parser.is_none());
        assert!(cli.input.is_none());
    }

    #[test]
    fn parses_repeated_parameters() {
        let cli = Cli::parse_from([
            "sink-receiver",
            "--ipc",
            "rpc",
            "--parameter",
            "acks=1",
            "--parameter",
            "auto.offset.reset=earliest",
            "--parser",
            "snmp",
        ]);
        assert_eq!(cli.ipc, "rpc");
        assert_eq!(cli.parameters, ["acks=1", "auto.offset.reset=earliest"]);
        assert_eq!(cli.parser.as_deref(), Some("snmp"));
    }
}
