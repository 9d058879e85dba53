// SPDX-License-Identifier: MPL-2.0

//! Network discovery and sampling

pub mod bus;
pub mod connection;
pub mod identity;
pub mod throughput;

pub use bus::{PropertyReader, SystemBus};
pub use connection::resolve_default;
pub use identity::{Identity, resolve_identity};
pub use throughput::{CounterSource, SysfsCounters, Throughput, measure};

/// Root NetworkManager object
pub const NM_PATH: &str = "/org/freedesktop/NetworkManager";

pub const NM_INTERFACE: &str = "org.freedesktop.NetworkManager";
pub const ACTIVE_CONNECTION_INTERFACE: &str = "org.freedesktop.NetworkManager.Connection.Active";
pub const IP4_CONFIG_INTERFACE: &str = "org.freedesktop.NetworkManager.IP4Config";
pub const DEVICE_INTERFACE: &str = "org.freedesktop.NetworkManager.Device";
pub const WIRELESS_INTERFACE: &str = "org.freedesktop.NetworkManager.Device.Wireless";
pub const ACCESS_POINT_INTERFACE: &str = "org.freedesktop.NetworkManager.AccessPoint";

/// `Type` tag NetworkManager uses for Wi-Fi connections
pub const WIRELESS_TYPE: &str = "802-11-wireless";
