//! Monitoring node binary.
//!
//! Runs the telemetry reporter over UDP: a receive loop that applies
//! remote configuration datagrams and a tick loop that assembles and
//! sends the periodic report. Diagnostics come from a seeded simulated
//! source until a real mesh stack is wired in.

use anyhow::Context;
use clap::Parser;
use monitor_report::{ConfigStore, Reporter};
use monitor_wire::ReportingConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod logging;
mod sim;
mod transport;

use config::NodeConfig;
use logging::MonitorLogFormatter;
use sim::SimDiagnostics;

/// Mesh telemetry monitoring node
#[derive(Parser, Debug)]
#[command(name = "monitor", version, about = "Mesh telemetry monitoring node")]
struct Args {
    /// Listen address for configuration datagrams, e.g. 0.0.0.0:6960
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Collector address reports are sent to, e.g. 10.0.0.1:6960
    #[arg(long)]
    collector: Option<SocketAddr>,

    /// Path to the service configuration file
    #[arg(long, default_value = "monitor.yaml")]
    config: PathBuf,

    /// Size budget for one report datagram
    #[arg(long)]
    max_report_bytes: Option<usize>,

    /// Delay before the first tick, letting the stack settle, e.g. 1s
    #[arg(long, default_value = "1s")]
    startup_delay: humantime::Duration,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seed for the simulated diagnostics source
    #[arg(long)]
    sim_seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt()
        .event_format(MonitorLogFormatter::new("monitor"))
        .with_env_filter(filter)
        .init();

    let mut node = NodeConfig::load_from_file(&args.config)?;
    if let Some(listen) = args.listen {
        node.listen = listen;
    }
    if let Some(collector) = args.collector {
        node.collector = Some(collector);
    }
    if let Some(max_report_bytes) = args.max_report_bytes {
        node.max_report_bytes = max_report_bytes;
    }
    if let Some(sim_seed) = args.sim_seed {
        node.sim_seed = sim_seed;
    }

    let initial = ReportingConfig {
        send_interval_min: node.initial_interval_min.max(1),
        ..ReportingConfig::default()
    };
    let store = ConfigStore::new(initial);
    let reporter = Reporter::new(Arc::new(SimDiagnostics::new(node.sim_seed)));

    let socket = Arc::new(
        UdpSocket::bind(node.listen)
            .await
            .with_context(|| format!("binding {}", node.listen))?,
    );
    info!(
        "monitoring node up on {}, collector {:?}, {} byte reports",
        node.listen, node.collector, node.max_report_bytes
    );

    // Let the surrounding stack finish starting before the first tick.
    tokio::time::sleep(args.startup_delay.into()).await;

    let recv = tokio::spawn(transport::recv_loop(Arc::clone(&socket), store.clone()));
    let report = tokio::spawn(transport::report_loop(
        socket,
        node.collector,
        store,
        reporter,
        node.max_report_bytes,
    ));

    tokio::select! {
        result = recv => result.context("receive loop exited")?,
        result = report => result.context("report loop exited")?,
    }
    Ok(())
}
