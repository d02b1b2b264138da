//! # Runtime Configuration
//!
//! Everything that differs between operating systems lives in one
//! [`PlatformProfile`] table, selected once with [`Platform::current`].
//! The discovery algorithm itself never branches on the platform.

use std::time::Duration;

/// Port probed when the caller does not ask for a specific one.
pub const DEFAULT_PORT: u16 = 8800;

/// Timeout for the one-shot health check of an already known address.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(300);

/// Interface name fragments that belong to hypervisor, VM bridge or
/// container adapters.
pub const VIRTUAL_ADAPTER_FRAGMENTS: &[&str] = &[
    "VMware",
    "VirtualBox",
    "Hyper-V",
    "vboxnet",
    "vmnet",
    "virbr",
    "docker",
    "br-",
    "veth",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// Platform specific tuning for interface selection and probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Interface names tried first, in order.
    pub priority_interfaces: &'static [&'static str],
    /// Interface names containing any of these are skipped by the fallback scan.
    pub virtual_adapters: &'static [&'static str],
    /// Also match both lists against the adapter description. Windows names
    /// its adapters `\Device\NPF_{GUID}` and keeps the friendly name there.
    pub match_description: bool,
    pub probe_timeout: Duration,
    /// Number of hosts probed concurrently during a sweep.
    pub batch_width: usize,
    pub health_check_timeout: Duration,
}

impl PlatformProfile {
    pub fn for_platform(platform: Platform) -> Self {
        // Windows signals failed handshakes slowly and has a smaller socket budget.
        let (priority_interfaces, probe_timeout, batch_width): (&'static [&'static str], u64, usize) =
            match platform {
                Platform::Windows => (
                    &["Ethernet", "Wi-Fi", "WiFi", "이더넷", "Local Area Connection"],
                    1_000,
                    25,
                ),
                Platform::MacOs => (&["en0", "en1", "en2"], 500, 50),
                Platform::Linux => (&["eth0", "eth1", "wlan0", "wlan1"], 500, 50),
                Platform::Other => (&[], 500, 50),
            };

        Self {
            platform,
            priority_interfaces,
            virtual_adapters: VIRTUAL_ADAPTER_FRAGMENTS,
            match_description: platform == Platform::Windows,
            probe_timeout: Duration::from_millis(probe_timeout),
            batch_width,
            health_check_timeout: HEALTH_CHECK_TIMEOUT,
        }
    }

    pub fn current() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::current()
    }
}

/// User facing settings, usually filled in from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Overrides [`PlatformProfile::probe_timeout`].
    pub probe_timeout: Option<Duration>,
    /// Overrides [`PlatformProfile::batch_width`].
    pub batch_width: Option<usize>,
    /// Fetch the page title and server banner after a find.
    pub metadata: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            probe_timeout: None,
            batch_width: None,
            metadata: false,
            quiet: 0,
        }
    }
}

impl Config {
    /// The current platform's profile with this config's overrides applied.
    pub fn profile(&self) -> PlatformProfile {
        self.apply_to(PlatformProfile::current())
    }

    pub fn apply_to(&self, mut profile: PlatformProfile) -> PlatformProfile {
        if let Some(probe_timeout) = self.probe_timeout.filter(|timeout| !timeout.is_zero()) {
            profile.probe_timeout = probe_timeout;
        }
        if let Some(batch_width) = self.batch_width {
            profile.batch_width = batch_width.max(1);
        }
        profile
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
