use std::process::ExitCode;
use std::time::{Duration, Instant};

use colored::*;
use lanseek_common::config::Config;
use lanseek_core::{DiscoveredService, DiscoveryService, ServiceStatus};

use crate::terminal::{colors, format, print, spinner};

pub async fn find(cfg: &Config, saved: Option<&str>) -> anyhow::Result<ExitCode> {
    let service = DiscoveryService::new(cfg.profile());

    spinner::start(format!("Looking for port {}...", cfg.port), cfg.quiet);
    let start_time: Instant = Instant::now();
    let found = service.reconnect(saved, cfg.port, cfg.probe_timeout).await;
    spinner::stop();

    let Some(found) = found else {
        no_service_found(cfg);
        return Ok(ExitCode::FAILURE);
    };

    let status: Option<ServiceStatus> = match cfg.metadata {
        true => Some(service.enrich(&found).await),
        false => None,
    };

    discovery_ends(&found, status.as_ref(), start_time.elapsed(), cfg);
    Ok(ExitCode::SUCCESS)
}

fn no_service_found(cfg: &Config) {
    print::header("nothing found", cfg.quiet);
    print::no_results(cfg.quiet);
    print::print_status(format!("No service answered on port {}", cfg.port));
}

fn discovery_ends(
    found: &DiscoveredService,
    status: Option<&ServiceStatus>,
    total_time: Duration,
    cfg: &Config,
) {
    if cfg.quiet > 1 {
        print::print(&found.url);
        return;
    }

    print::header("service discovery", cfg.quiet);
    print::tree_head(&found.url);

    let mut details = format::service_to_details(found);
    if let Some(status) = status {
        details.extend(format::status_to_details(status, found.port));
    }
    print::as_tree_one_level(details);

    let summary: String = format!("Found {} in {:.2}s", found.url, total_time.as_secs_f64());
    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&summary);
        }
        _ => print::print_status(summary.color(colors::PRIMARY).to_string()),
    }
}
