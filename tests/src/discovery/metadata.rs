#![cfg(test)]
use std::time::Duration;

use anyhow::Context;
use lanseek_core::{DiscoveredService, ServiceStatus};
use lanseek_protocols::http::ServiceKind;

use crate::utils::{closed_port, service, spawn_responder, RecordingProber, StaticInterface};

const TIMEOUT: Duration = Duration::from_millis(300);

fn page(body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 200 OK\r\nServer: nas-web/2.1\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

#[tokio::test]
async fn inspect_enriches_http_service() -> anyhow::Result<()> {
    let port = spawn_responder(page("<html><title>A &amp; B &lt;tag&gt;</title></html>")).await?;
    let prober = RecordingProber::default();

    let status = service(StaticInterface(None), &prober, TIMEOUT)
        .inspect(&DiscoveredService::new("127.0.0.1", port))
        .await;

    let metadata = status.metadata().context("metadata missing")?;
    assert_eq!(metadata.title.as_deref(), Some("A & B <tag>"));
    assert_eq!(metadata.server.as_deref(), Some("nas-web/2.1"));
    assert_eq!(metadata.kind, ServiceKind::WebPage);
    Ok(())
}

#[tokio::test]
async fn enrich_does_not_reconnect_before_fetching() -> anyhow::Result<()> {
    let port = spawn_responder(page("<html><title>Router</title></html>")).await?;
    let prober = RecordingProber::default();

    let status = service(StaticInterface(None), &prober, TIMEOUT)
        .enrich(&DiscoveredService::new("127.0.0.1", port))
        .await;

    let metadata = status.metadata().context("metadata missing")?;
    assert_eq!(metadata.title.as_deref(), Some("Router"));
    assert_eq!(prober.count(), 0);
    Ok(())
}

#[tokio::test]
async fn inspect_keeps_non_http_service_reachable() -> anyhow::Result<()> {
    let port = spawn_responder(Vec::new()).await?;
    let prober = RecordingProber::default();

    let status = service(StaticInterface(None), &prober, TIMEOUT)
        .inspect(&DiscoveredService::new("127.0.0.1", port))
        .await;

    assert_eq!(status, ServiceStatus::Reachable { metadata: None });
    Ok(())
}

#[tokio::test]
async fn inspect_reports_closed_port_unreachable() -> anyhow::Result<()> {
    let port = closed_port().await?;
    let prober = RecordingProber::default();

    let status = service(StaticInterface(None), &prober, TIMEOUT)
        .inspect(&DiscoveredService::new("127.0.0.1", port))
        .await;

    assert_eq!(status, ServiceStatus::Unreachable);
    Ok(())
}
