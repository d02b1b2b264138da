use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lanseek_common::config::{Platform, PlatformProfile};
use lanseek_common::network::interface::NetworkInterfaceInfo;
use lanseek_core::discovery::InterfaceSource;
use lanseek_core::network::tcp::{PortProber, ProbeResult, TcpProber};
use lanseek_core::DiscoveryService;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Pretends the host sits on `address/netmask`.
pub struct StaticInterface(pub Option<NetworkInterfaceInfo>);

impl StaticInterface {
    pub fn on(address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Self(Some(NetworkInterfaceInfo {
            address,
            netmask,
            name: "test0".to_string(),
        }))
    }
}

impl InterfaceSource for StaticInterface {
    fn primary_interface(&self) -> Option<NetworkInterfaceInfo> {
        self.0.clone()
    }
}

/// Real TCP probes, with a log of every host that was probed.
#[derive(Clone, Default)]
pub struct RecordingProber {
    pub probed: Arc<Mutex<Vec<String>>>,
    pub count: Arc<AtomicUsize>,
}

impl RecordingProber {
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortProber for RecordingProber {
    async fn probe(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.probed.lock().unwrap().push(host.to_string());
        TcpProber.probe(host, port, timeout).await
    }
}

pub fn profile(probe_timeout: Duration) -> PlatformProfile {
    let mut profile = PlatformProfile::for_platform(Platform::Linux);
    profile.probe_timeout = probe_timeout;
    profile
}

pub fn service(interface: StaticInterface, prober: &RecordingProber, timeout: Duration) -> DiscoveryService {
    DiscoveryService::with_parts(Box::new(interface), Box::new(prober.clone()), profile(timeout))
}

/// A port nothing listens on right now.
pub async fn closed_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}

/// Answers every connection with `response` and then closes it.
pub async fn spawn_responder(response: Vec<u8>) -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = tokio::time::timeout(Duration::from_millis(200), stream.read(&mut buf)).await;
                let _ = stream.write_all(&response).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Ok(port)
}
