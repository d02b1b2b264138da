use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Starts the spinner unless `quiet` asks for plain output.
pub fn start(msg: String, quiet: u8) {
    if quiet > 0 {
        return;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICKS));
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb);
    }
}

pub fn stop() {
    if let Ok(mut active) = ACTIVE.lock() {
        if let Some(pb) = active.take() {
            pb.finish_and_clear();
        }
    }
}

/// Prints above the running spinner. Returns `false` when none is running.
pub fn println(msg: &str) -> bool {
    match ACTIVE.lock() {
        Ok(active) => match active.as_ref() {
            Some(pb) => {
                pb.println(msg);
                true
            }
            None => false,
        },
        Err(_) => false,
    }
}
