#![cfg(test)]
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use anyhow::Context;
use lanseek_common::network::subnet::HOST_OCTETS;
use lanseek_core::discovery::{LOCALHOST, LOOPBACK};
use tokio::net::TcpListener;

use crate::utils::{closed_port, service, RecordingProber, StaticInterface};

const TIMEOUT: Duration = Duration::from_millis(200);

fn lan() -> StaticInterface {
    StaticInterface::on(Ipv4Addr::new(192, 0, 2, 10), Ipv4Addr::new(255, 255, 255, 0))
}

/// 127.0.0.0/24, every address of which is routable to this host on Linux.
fn loopback_net() -> StaticInterface {
    StaticInterface::on(Ipv4Addr::new(127, 0, 0, 5), Ipv4Addr::new(255, 255, 255, 0))
}

/// A loopback listener is found without sweeping the subnet.
#[tokio::test]
async fn discovery_loopback_listener() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let prober = RecordingProber::default();

    let found = service(lan(), &prober, TIMEOUT)
        .find_service(port, None)
        .await
        .context("loopback listener not found")?;

    assert!(found.host == LOCALHOST || found.host == LOOPBACK, "unexpected host {}", found.host);
    assert_eq!(found.url, format!("http://{}:{port}", found.host));
    assert!(prober.count() <= 2, "swept the subnet: {:?}", prober.probed());
    assert!(prober.probed().iter().all(|host| host == LOCALHOST || host == LOOPBACK));
    Ok(())
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn discovery_subnet_listener() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.37:0").await?;
    let port = listener.local_addr()?.port();
    let prober = RecordingProber::default();

    let found = service(loopback_net(), &prober, TIMEOUT)
        .find_service(port, None)
        .await;

    assert_eq!(found.map(|s| s.url), Some(format!("http://127.0.0.37:{port}")));
    Ok(())
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn discovery_prefers_lower_host_in_batch() -> anyhow::Result<()> {
    let high = TcpListener::bind("127.0.0.40:0").await?;
    let port = high.local_addr()?.port();
    let _low = TcpListener::bind(("127.0.0.12", port)).await?;

    for _ in 0..3 {
        let prober = RecordingProber::default();
        let found = service(loopback_net(), &prober, TIMEOUT)
            .find_service(port, None)
            .await;

        assert_eq!(found.map(|s| s.host), Some("127.0.0.12".to_string()));
    }
    Ok(())
}

#[tokio::test]
async fn discovery_without_listener_is_bounded() -> anyhow::Result<()> {
    let port = closed_port().await?;
    let prober = RecordingProber::default();
    let svc = service(loopback_net(), &prober, TIMEOUT);
    let batches = HOST_OCTETS.count().div_ceil(svc.profile().batch_width) as u32;

    let start = Instant::now();
    let found = svc.find_service(port, None).await;
    let elapsed = start.elapsed();

    assert_eq!(found, None);
    assert_eq!(prober.count(), 2 + HOST_OCTETS.count());
    assert!(
        elapsed < TIMEOUT * (batches + 2) + Duration::from_secs(2),
        "took {elapsed:?}"
    );
    Ok(())
}

#[tokio::test]
async fn zero_timeout_still_finds_listener() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let prober = RecordingProber::default();

    let found = service(lan(), &prober, TIMEOUT)
        .find_service(port, Some(Duration::ZERO))
        .await;

    assert!(found.is_some(), "zero timeout reported every host closed");
    Ok(())
}

#[tokio::test]
async fn reachability_follows_listener() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let prober = RecordingProber::default();
    let svc = service(lan(), &prober, TIMEOUT);

    let found = svc.find_service(port, None).await.context("listener not found")?;
    assert!(svc.is_reachable(&found.host, found.port).await);
    assert!(lanseek_core::is_reachable(LOOPBACK, port).await);

    drop(listener);

    assert!(!svc.is_reachable(&found.host, found.port).await);
    assert!(!lanseek_core::is_reachable(LOOPBACK, port).await);
    Ok(())
}

#[tokio::test]
async fn reconnect_uses_saved_address_when_online() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let prober = RecordingProber::default();
    let saved = format!("http://127.0.0.1:{port}/dashboard");

    let found = service(lan(), &prober, TIMEOUT)
        .reconnect(Some(&saved), 1, None)
        .await;

    assert_eq!(found.map(|s| s.url), Some(format!("http://127.0.0.1:{port}")));
    assert_eq!(prober.probed(), vec![LOOPBACK.to_string()]);
    Ok(())
}
