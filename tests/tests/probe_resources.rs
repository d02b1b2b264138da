//! Descriptor accounting for the port probe. Lives in its own test binary so
//! no other test opens sockets while descriptors are being counted.
#![cfg(target_os = "linux")]

use std::time::Duration;

use lanseek_core::network::tcp::probe;
use tokio::net::TcpListener;

fn open_descriptors() -> usize {
    std::fs::read_dir("/proc/self/fd").map(|dir| dir.count()).unwrap_or(0)
}

#[tokio::test]
async fn probe_releases_socket_on_every_path() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let open_port = listener.local_addr()?.port();

    let closed = TcpListener::bind("127.0.0.1:0").await?;
    let closed_port = closed.local_addr()?.port();
    drop(closed);

    // Warm up the runtime before taking the baseline.
    probe("127.0.0.1", open_port, Duration::from_millis(200)).await;
    let baseline = open_descriptors();

    for _ in 0..50 {
        // Success.
        assert!(probe("127.0.0.1", open_port, Duration::from_millis(200)).await.open);
        // Connect error.
        assert!(!probe("127.0.0.1", closed_port, Duration::from_millis(200)).await.open);
        // Timer expiry (or an immediate unreachable error without a route).
        assert!(!probe("10.255.255.1", 9, Duration::from_millis(1)).await.open);
    }

    let after = open_descriptors();
    assert!(after <= baseline, "descriptors leaked: {baseline} -> {after}");
    Ok(())
}
