//! UDP transport loops for the monitoring node.
//!
//! Two independent tasks share one socket and one [`ConfigStore`]: the
//! receive loop applies inbound configuration datagrams, the report loop
//! wakes on a jittered interval, assembles a report, and sends it to the
//! collector. Neither loop blocks the other; the only shared state is the
//! configuration snapshot.

use monitor_report::{jittered_interval, ConfigStore, Reporter};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Configuration datagrams are tiny; anything larger is noise.
const RECV_BUFFER_BYTES: usize = 512;

/// Receive loop: configuration datagrams update the live configuration.
///
/// Malformed datagrams are logged and dropped; the next periodic or next
/// received message recovers.
pub async fn recv_loop(socket: Arc<UdpSocket>, store: ConfigStore) {
    let mut buf = [0u8; RECV_BUFFER_BYTES];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => match store.apply_datagram(&buf[..len]) {
                Ok(config) => info!(
                    component = "transport",
                    "configuration v{} applied from {} (interval {} min)",
                    config.version,
                    from,
                    config.send_interval_min
                ),
                Err(err) => warn!(
                    component = "transport",
                    "dropping config datagram from {}: {}", from, err
                ),
            },
            Err(err) => {
                warn!(component = "transport", "recv error: {}", err);
                sleep(Duration::from_millis(100)).await;
            }
        }
    }
}

/// Reporting tick loop.
///
/// The interval is re-read from the live configuration every cycle, so a
/// new configuration takes effect on the next tick. A tick that cannot
/// assemble or send its report skips; the next tick retries independently.
pub async fn report_loop(
    socket: Arc<UdpSocket>,
    collector: Option<SocketAddr>,
    store: ConfigStore,
    reporter: Reporter,
    max_report_bytes: usize,
) {
    loop {
        let interval = jittered_interval(store.current().send_interval_min);
        debug!(component = "report", "next report in {:.1?}", interval);
        sleep(interval).await;

        let config = store.current();
        let report = match reporter.build_report(&config, max_report_bytes) {
            Ok(report) => report,
            Err(err) => {
                warn!(component = "report", "report skipped this tick: {}", err);
                continue;
            }
        };

        let Some(collector) = collector else {
            debug!(
                component = "report",
                "no collector configured, dropping {} byte report",
                report.len()
            );
            continue;
        };

        match socket.send_to(&report, collector).await {
            Ok(sent) => debug!(
                component = "report",
                "sent {} byte report to {}", sent, collector
            ),
            Err(err) => warn!(
                component = "report",
                "failed to send report to {}: {}", collector, err
            ),
        }
    }
}
