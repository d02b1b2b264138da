use std::process::ExitCode;

use anyhow::Context;
use lanseek_common::config::Config;
use lanseek_core::{DiscoveredService, DiscoveryService, ServiceStatus};

use crate::terminal::{format, print};

/// Health check of a saved address, optionally with HTTP details.
pub async fn check(url: &str, cfg: &Config) -> anyhow::Result<ExitCode> {
    let target = DiscoveredService::from_url(url).context("parsing saved address")?;
    let service = DiscoveryService::new(cfg.profile());

    let status = match cfg.metadata {
        true => service.inspect(&target).await,
        false => match service.is_reachable(&target.host, target.port).await {
            true => ServiceStatus::Reachable { metadata: None },
            false => ServiceStatus::Unreachable,
        },
    };

    print::header("health check", cfg.quiet);
    print::tree_head(&target.url);

    let mut details = format::service_to_details(&target);
    match (&status, cfg.metadata) {
        (ServiceStatus::Reachable { .. }, false) => {
            details.extend(format::status_to_details(&status, target.port).into_iter().take(1))
        }
        _ => details.extend(format::status_to_details(&status, target.port)),
    }
    print::as_tree_one_level(details);

    Ok(match status.is_reachable() {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    })
}
