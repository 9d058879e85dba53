// SPDX-License-Identifier: MPL-2.0

//! Property reads against NetworkManager over the system D-Bus.
//!
//! Everything above this module asks for one property at a time through
//! [`PropertyReader`], so resolution logic can run against an in-memory
//! object tree in tests.

use std::time::Duration;

use zbus::fdo::PropertiesProxy;
use zbus::names::InterfaceName;
use zbus::proxy::CacheProperties;
use zbus::zvariant::{ObjectPath, OwnedValue};

use crate::config::Config;
use crate::error::{self, Error, ErrorKind, Result};

/// Fetches a single named property of a remote object.
pub trait PropertyReader {
    async fn read(&self, object: &ObjectPath<'_>, interface: &str, property: &str) -> Result<OwnedValue>;
}

/// Reads a property and decodes it into `T`.
///
/// A value of the wrong D-Bus type is reported as [`Error::Decode`] rather
/// than coerced to a default.
pub async fn fetch<T, R>(reader: &R, object: &ObjectPath<'_>, interface: &str, property: &str) -> Result<T>
where
    R: PropertyReader,
    T: TryFrom<OwnedValue>,
    T::Error: std::fmt::Display,
{
    let value = reader.read(object, interface, property).await?;
    T::try_from(value).map_err(|e| Error::decode(object.as_str(), property, e))
}

/// [`PropertyReader`] backed by a live system bus connection.
pub struct SystemBus {
    conn: zbus::Connection,
    service: String,
    timeout: Duration,
}

impl SystemBus {
    pub async fn connect(config: &Config) -> Result<Self> {
        let conn = error::within(
            config.call_timeout,
            ErrorKind::BusCommunication,
            || String::from("connecting to the system bus"),
            async { zbus::Connection::system().await.map_err(|e| Error::Connect(e.to_string())) },
        )
        .await?;

        log::debug!("connected to the system bus, talking to {}", config.service);

        Ok(Self {
            conn,
            service: config.service.clone(),
            timeout: config.call_timeout,
        })
    }

    async fn get(&self, object: &ObjectPath<'_>, interface: &str, property: &str) -> Result<OwnedValue> {
        let fail = |e: zbus::Error| Error::bus(object.as_str(), property, e);

        let interface = InterfaceName::try_from(interface)
            .map_err(zbus::Error::from)
            .map_err(fail)?;
        let proxy = PropertiesProxy::builder(&self.conn)
            .destination(self.service.as_str())
            .map_err(fail)?
            .path(object.clone())
            .map_err(fail)?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(fail)?;

        proxy
            .get(interface, property)
            .await
            .map_err(zbus::Error::from)
            .map_err(fail)
    }
}

impl PropertyReader for SystemBus {
    async fn read(&self, object: &ObjectPath<'_>, interface: &str, property: &str) -> Result<OwnedValue> {
        log::trace!("Get {interface}.{property} on {object}");
        error::within(
            self.timeout,
            ErrorKind::BusCommunication,
            || format!("{object}: reading {property}"),
            self.get(object, interface, property),
        )
        .await
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeBus;
    use super::*;

    #[tokio::test]
    async fn fetch_decodes_the_requested_type() {
        let mut bus = FakeBus::new();
        bus.set("/nm/ac/1", "State", 2u32);

        let object = ObjectPath::from_static_str_unchecked("/nm/ac/1");
        let state: u32 = fetch(&bus, &object, "org.freedesktop.NetworkManager.Connection.Active", "State")
            .await
            .unwrap();
        assert_eq!(state, 2);
    }

    #[tokio::test]
    async fn fetch_rejects_a_mistyped_value() {
        let mut bus = FakeBus::new();
        bus.set("/nm/ac/1", "Default", "yes");

        let object = ObjectPath::from_static_str_unchecked("/nm/ac/1");
        let err = fetch::<bool, _>(&bus, &object, "org.freedesktop.NetworkManager.Connection.Active", "Default")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { ref property, .. } if property == "Default"));
    }

    #[tokio::test]
    async fn missing_property_is_a_bus_error() {
        let bus = FakeBus::new();
        let object = ObjectPath::from_static_str_unchecked("/nm/ac/1");
        let err = fetch::<u32, _>(&bus, &object, "org.freedesktop.NetworkManager.Connection.Active", "State")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BusCommunication);
    }

    #[test]
    fn fdo_error_keeps_its_message_as_a_bus_error() {
        let fdo = zbus::fdo::Error::UnknownProperty(String::from("no such property 'Ssid'"));
        let err = Error::bus("/nm/ap/7", "Ssid", zbus::Error::from(fdo));
        assert_eq!(err.kind(), ErrorKind::BusCommunication);
        assert!(err.to_string().contains("no such property 'Ssid'"));
    }
}
