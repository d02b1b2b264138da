//! The **sweep scheduler**.
//!
//! Probing 254 hosts one after another is too slow for interactive use, while
//! probing all of them at once can exhaust the socket table and floods the
//! LAN. Hosts are therefore probed in fixed-width batches: every probe of a
//! batch is in flight at the same time, the whole batch is joined, and only
//! then is the next batch started.
//!
//! Matches are picked in address order, not completion order. A batch that
//! contains several open hosts always reports the first one in the host list,
//! and an earlier batch always wins over a later one.

use std::time::Duration;

use futures_util::future::{BoxFuture, join_all};
use tracing::{debug, trace};

use crate::network::tcp::{PortProber, ProbeResult};

/// Probes of one batch, all in flight together.
pub struct ProbeBatch<'a> {
    probes: Vec<BoxFuture<'a, ProbeResult>>,
}

impl<'a> ProbeBatch<'a> {
    pub fn launch(
        prober: &'a dyn PortProber,
        hosts: &'a [String],
        port: u16,
        timeout: Duration,
    ) -> Self {
        let probes = hosts
            .iter()
            .map(|host| prober.probe(host, port, timeout))
            .collect();
        Self { probes }
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Waits for every probe, then returns the first open one in host order.
    pub async fn join(self) -> Option<ProbeResult> {
        join_all(self.probes)
            .await
            .into_iter()
            .find(|result| result.open)
    }
}

/// Probes `hosts` in batches of `batch_width` and returns the URL of the first
/// open one. No further batch is launched once a batch produced a match.
pub async fn sweep(
    prober: &dyn PortProber,
    hosts: &[String],
    port: u16,
    timeout: Duration,
    batch_width: usize,
) -> Option<String> {
    let batch_width = batch_width.max(1);
    debug!(
        "Sweeping {} hosts on port {port} in batches of {batch_width}",
        hosts.len()
    );

    for (idx, chunk) in hosts.chunks(batch_width).enumerate() {
        let batch = ProbeBatch::launch(prober, chunk, port, timeout);
        trace!("Batch {idx}: {} probes in flight", batch.len());

        if let Some(found) = batch.join().await {
            debug!("Batch {idx} found {found}");
            return Some(found.url());
        }
    }

    debug!("No host answered on port {port}");
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
