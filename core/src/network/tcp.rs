use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Outcome of one connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub host: String,
    pub port: u16,
    pub open: bool,
}

impl ProbeResult {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.open { "open" } else { "closed" };
        write!(f, "{}:{} {state}", self.host, self.port)
    }
}

/// Answers "is anything listening on `host:port`?".
///
/// Implementations never fail: refused, unreachable, unresolvable and timed
/// out attempts all report `open: false`.
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn probe(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult;
}

/// Plain TCP handshake prober.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProber;

#[async_trait]
impl PortProber for TcpProber {
    async fn probe(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult {
        probe(host, port, timeout).await
    }
}

/// Races a TCP connect against `probe_timeout`.
///
/// Whichever path wins, the socket is gone before this returns: a connected
/// stream is dropped right away and an expired connect future is dropped by
/// [`timeout`], which cancels the attempt.
pub async fn probe(host: &str, port: u16, probe_timeout: Duration) -> ProbeResult {
    let open = match timeout(probe_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            trace!("{host}:{port} refused: {e}");
            false
        }
        Err(_elapsed) => {
            trace!("{host}:{port} timed out after {probe_timeout:?}");
            false
        }
    };

    ProbeResult {
        host: host.to_string(),
        port,
        open,
    }
}

/// Health check for an address found earlier. Never cached.
pub async fn is_reachable(host: &str, port: u16, probe_timeout: Duration) -> bool {
    probe(host, port, probe_timeout).await.open
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
