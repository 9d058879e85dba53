// SPDX-License-Identifier: MPL-2.0

//! Runtime settings for a single sampling run.
//!
//! The program takes no flags, environment variables or config files, so the
//! values here are fixed at their defaults in `main`. Tests construct their
//! own `Config` to point the sampler at a temporary sysfs tree or to shorten
//! waits.

use std::path::PathBuf;
use std::time::Duration;

/// Well-known bus name of NetworkManager on the system bus.
pub const NM_SERVICE: &str = "org.freedesktop.NetworkManager";

/// Where the kernel exposes per-interface statistics.
pub const SYSFS_NET_ROOT: &str = "/sys/class/net";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bus name every property read is addressed to
    pub service: String,
    /// Root of the `<iface>/statistics/<dir>_bytes` tree
    pub sysfs_net_root: PathBuf,
    /// Delay between the two counter sampling rounds
    pub sample_interval: Duration,
    /// Upper bound for any single bus call or counter read
    pub call_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: String::from(NM_SERVICE),
            sysfs_net_root: PathBuf::from(SYSFS_NET_ROOT),
            sample_interval: Duration::from_secs(1),
            call_timeout: Duration::from_secs(5),
        }
    }
}
