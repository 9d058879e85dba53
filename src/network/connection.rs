// SPDX-License-Identifier: MPL-2.0

//! Active connection discovery
//!
//! NetworkManager lists its live connections on the root object. Each one is
//! read in full, in the order the service reports them, until the first one
//! flagged `Default` turns up. Connections after that match are never read.

use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use super::bus::{PropertyReader, fetch};
use super::{ACTIVE_CONNECTION_INTERFACE, NM_INTERFACE, NM_PATH, WIRELESS_TYPE};
use crate::error::{Error, Result};

/// Snapshot of one `org.freedesktop.NetworkManager.Connection.Active` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConnection {
    pub path: OwnedObjectPath,
    /// Connection type tag, e.g. `802-3-ethernet` or `802-11-wireless`
    pub kind: String,
    pub state: u32,
    pub is_default: bool,
    pub is_vpn: bool,
    pub ip4_config: OwnedObjectPath,
    pub devices: Vec<OwnedObjectPath>,
}

impl ActiveConnection {
    /// Reads every property of the active connection at `path`.
    ///
    /// The first failed read aborts; nothing is skipped or defaulted.
    pub async fn load<R: PropertyReader>(reader: &R, path: &ObjectPath<'_>) -> Result<Self> {
        let iface = ACTIVE_CONNECTION_INTERFACE;

        let state: u32 = fetch(reader, path, iface, "State").await?;
        let ip4_config: OwnedObjectPath = fetch(reader, path, iface, "Ip4Config").await?;
        let kind: String = fetch(reader, path, iface, "Type").await?;
        let is_default: bool = fetch(reader, path, iface, "Default").await?;
        let is_vpn: bool = fetch(reader, path, iface, "Vpn").await?;
        let devices: Vec<OwnedObjectPath> = fetch(reader, path, iface, "Devices").await?;

        Ok(Self {
            path: OwnedObjectPath::from(path.clone()),
            kind,
            state,
            is_default,
            is_vpn,
            ip4_config,
            devices,
        })
    }

    pub fn is_wireless(&self) -> bool {
        self.kind == WIRELESS_TYPE
    }

    /// Device backing this connection. Only the first one is ever used.
    pub fn primary_device(&self) -> Result<&OwnedObjectPath> {
        self.devices
            .first()
            .ok_or_else(|| Error::NotFound(format!("connection {} has no devices", self.path.as_str())))
    }
}

/// Lists active connections and returns the first one marked default.
pub async fn resolve_default<R: PropertyReader>(reader: &R) -> Result<ActiveConnection> {
    let root = ObjectPath::from_static_str_unchecked(NM_PATH);
    let paths: Vec<OwnedObjectPath> = fetch(reader, &root, NM_INTERFACE, "ActiveConnections").await?;
    log::debug!("{} active connection(s)", paths.len());

    for path in &paths {
        let connection = ActiveConnection::load(reader, path).await?;
        log::debug!(
            "{}: type={} state={} default={} vpn={}",
            path.as_str(),
            connection.kind,
            connection.state,
            connection.is_default,
            connection.is_vpn
        );
        if connection.is_default {
            return Ok(connection);
        }
    }

    Err(Error::NotFound(String::from("no active connection found")))
}
