// SPDX-License-Identifier: MPL-2.0

//! Human-readable identity of the selected connection: its interface name
//! and either its IPv4 address or, on Wi-Fi, the network name.

use std::collections::HashMap;

use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use super::bus::{PropertyReader, fetch};
use super::connection::ActiveConnection;
use super::{ACCESS_POINT_INTERFACE, DEVICE_INTERFACE, IP4_CONFIG_INTERFACE, WIRELESS_INTERFACE};
use crate::error::{Error, Result};

/// One entry of an `IP4Config.AddressData` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressData {
    pub address: String,
    pub prefix: u32,
}

impl AddressData {
    /// Decodes one `a{sv}` entry. `address` must be a string and `prefix` a
    /// `u32`; anything else is a decode error naming the field.
    fn decode(object: &str, entry: &HashMap<String, OwnedValue>) -> Result<Self> {
        let field = |name: &str| {
            entry
                .get(name)
                .map(|value| match &**value {
                    Value::Value(inner) => &**inner,
                    other => other,
                })
                .ok_or_else(|| Error::decode(object, "AddressData", format!("missing {name}")))
        };

        let address = match field("address")? {
            Value::Str(s) => s.as_str().to_string(),
            _ => return Err(Error::decode(object, "AddressData", "address is not a string")),
        };
        let prefix = match field("prefix")? {
            Value::U32(p) => *p,
            _ => return Err(Error::decode(object, "AddressData", "prefix is not a u32")),
        };

        Ok(Self { address, prefix })
    }
}

impl std::fmt::Display for AddressData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// `address/prefix`, or the SSID on wireless connections
    pub address: String,
    /// Kernel interface name, e.g. `wlp2s0`
    pub interface: String,
    pub connection_type: String,
    pub ssid: Option<String>,
}

impl Identity {
    pub fn is_wireless(&self) -> bool {
        self.ssid.is_some()
    }

    /// Extra tooltip clause disclosing the SSID, empty on wired connections.
    pub fn tooltip_suffix(&self) -> String {
        match &self.ssid {
            Some(ssid) => format!(", SSID: {ssid}"),
            None => String::new(),
        }
    }
}

pub async fn resolve_identity<R: PropertyReader>(reader: &R, connection: &ActiveConnection) -> Result<Identity> {
    let device = connection.primary_device()?;
    let interface: String = fetch(reader, device, DEVICE_INTERFACE, "Interface").await?;

    let mut address = first_address(reader, &connection.ip4_config).await?.to_string();

    let ssid = if connection.is_wireless() {
        let ssid = active_ssid(reader, device).await?;
        address.clone_from(&ssid);
        Some(ssid)
    } else {
        None
    };

    log::debug!("{interface}: {address} ({})", connection.kind);

    Ok(Identity {
        address,
        interface,
        connection_type: connection.kind.clone(),
        ssid,
    })
}

/// Only the first entry is decoded; later ones are never looked at.
async fn first_address<R: PropertyReader>(reader: &R, ip4_config: &OwnedObjectPath) -> Result<AddressData> {
    let entries: Vec<HashMap<String, OwnedValue>> =
        fetch(reader, ip4_config, IP4_CONFIG_INTERFACE, "AddressData").await?;
    let first = entries.first().ok_or(Error::NoAddress)?;
    AddressData::decode(ip4_config.as_str(), first)
}

async fn active_ssid<R: PropertyReader>(reader: &R, device: &OwnedObjectPath) -> Result<String> {
    let access_point: OwnedObjectPath = fetch(reader, device, WIRELESS_INTERFACE, "ActiveAccessPoint").await?;
    // NetworkManager uses "/" when the device is not associated
    if access_point.as_str() == "/" {
        return Err(Error::NotFound(format!("{} has no active access point", device.as_str())));
    }
    let ssid: Vec<u8> = fetch(reader, &access_point, ACCESS_POINT_INTERFACE, "Ssid").await?;
    Ok(String::from_utf8_lossy(&ssid).into_owned())
}
