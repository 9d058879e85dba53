// SPDX-License-Identifier: MPL-2.0

//! Status-bar payload
//!
//! A run always ends in exactly one JSON line with `text` and `tooltip`.
//! Failures are rendered into the same shape, so the bar shows "Error" with
//! the cause on hover instead of a dead module.

use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};
use crate::network::{Identity, Throughput};

/// Nerd Font glyph for an ethernet port
const WIRED_ICON: &str = "\u{f06f3}";
/// Nerd Font glyph for Wi-Fi
const WIRELESS_ICON: &str = "\u{f1eb}";

const ERROR_TEXT: &str = "Error";
const ENCODING_FALLBACK: &str = "Error while encoding error message";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub text: String,
    pub tooltip: String,
}

impl Report {
    pub fn new(identity: &Identity, throughput: &Throughput) -> Self {
        let icon = if identity.is_wireless() { WIRELESS_ICON } else { WIRED_ICON };
        Self {
            text: format!("{} {} {} {} ", throughput.rx, throughput.tx, identity.address, icon),
            tooltip: format!(
                "Interface: {}, Type: {}{}",
                identity.interface,
                identity.connection_type,
                identity.tooltip_suffix()
            ),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: String::from(ERROR_TEXT),
            tooltip: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of a whole run, reduced to what the bar needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Report),
    Failure(ErrorKind, String),
}

impl From<Result<Report>> for Outcome {
    fn from(result: Result<Report>) -> Self {
        match result {
            Ok(report) => Self::Success(report),
            Err(err) => Self::from(&err),
        }
    }
}

impl From<&Error> for Outcome {
    fn from(err: &Error) -> Self {
        Self::Failure(err.kind(), err.to_string())
    }
}

impl Outcome {
    pub fn render(self) -> String {
        self.render_with(Report::to_json)
    }

    /// Encodes the outcome with `encode`. A success that fails to encode is
    /// turned into a failure; a failure that fails to encode gets its tooltip
    /// swapped for a fixed message and is encoded once more.
    fn render_with(self, encode: impl Fn(&Report) -> Result<String>) -> String {
        match self {
            Self::Success(report) => match encode(&report) {
                Ok(line) => line,
                Err(err) => Self::from(&err).render_with(encode),
            },
            Self::Failure(kind, message) => {
                log::debug!("reporting {kind:?} failure: {message}");
                encode(&Report::error(message))
                    .or_else(|_| encode(&Report::error(ENCODING_FALLBACK)))
                    .unwrap_or_else(|_| format!(r#"{{"text":"{ERROR_TEXT}","tooltip":"{ENCODING_FALLBACK}"}}"#))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::network::throughput::Rate;

    fn throughput(rx_bytes: u64, tx_bytes: u64) -> Throughput {
        Throughput {
            rx: Rate::from_bytes(rx_bytes, Duration::from_secs(1)),
            tx: Rate::from_bytes(tx_bytes, Duration::from_secs(1)),
        }
    }

    fn identity(address: &str, interface: &str, connection_type: &str, ssid: Option<&str>) -> Identity {
        Identity {
            address: address.to_string(),
            interface: interface.to_string(),
            connection_type: connection_type.to_string(),
            ssid: ssid.map(str::to_string),
        }
    }

    #[test]
    fn wired_report() {
        let report = Report::new(
            &identity("192.168.1.5/24", "enp3s0", "802-3-ethernet", None),
            &throughput(512_000, 10 * 1024),
        );
        assert_eq!(report.text, "500.0KB/s 10.0KB/s 192.168.1.5/24 \u{f06f3} ");
        assert_eq!(report.tooltip, "Interface: enp3s0, Type: 802-3-ethernet");
    }

    #[test]
    fn wireless_report_discloses_ssid() {
        let report = Report::new(
            &identity("HomeNet", "wlp2s0", "802-11-wireless", Some("HomeNet")),
            &throughput(2048 * 1024, 0),
        );
        assert_eq!(report.text, "2.0MB/s 0.0KB/s HomeNet \u{f1eb} ");
        assert_eq!(report.tooltip, "Interface: wlp2s0, Type: 802-11-wireless, SSID: HomeNet");
    }

    #[test]
    fn success_renders_as_one_json_object() {
        let report = Report::new(
            &identity("10.0.0.2/8", "eth0", "802-3-ethernet", None),
            &throughput(0, 0),
        );
        let line = Outcome::Success(report).render();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["tooltip"], "Interface: eth0, Type: 802-3-ethernet");
        assert_eq!(value.as_object().unwrap().len(), 2);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn failures_render_as_error_text() {
        let outcome = Outcome::from(Err::<Report, _>(Error::NotFound(String::from("no active connection found"))));
        assert_eq!(
            outcome,
            Outcome::Failure(ErrorKind::NotFound, String::from("no active connection found"))
        );
        assert_eq!(
            outcome.render(),
            r#"{"text":"Error","tooltip":"no active connection found"}"#
        );
    }

    #[test]
    fn tooltip_is_escaped() {
        let line = Outcome::Failure(ErrorKind::OsRead, String::from("bad \"value\"\n")).render();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["tooltip"], "bad \"value\"\n");
    }

    #[test]
    fn unencodable_error_falls_back_to_fixed_tooltip() {
        let picky = |report: &Report| {
            if report.tooltip == ENCODING_FALLBACK {
                Report::to_json(report)
            } else {
                Err(Error::NoAddress)
            }
        };
        let line = Outcome::Failure(ErrorKind::BusCommunication, String::from("boom")).render_with(picky);
        assert_eq!(line, r#"{"text":"Error","tooltip":"Error while encoding error message"}"#);
    }

    #[test]
    fn unencodable_success_is_reported_as_error() {
        let picky = |report: &Report| {
            if report.text == ERROR_TEXT {
                Report::to_json(report)
            } else {
                Err(Error::NoAddress)
            }
        };
        let report = Report::new(&identity("10.0.0.2/8", "eth0", "802-3-ethernet", None), &throughput(0, 0));
        let line = Outcome::Success(report).render_with(picky);
        assert_eq!(line, r#"{"text":"Error","tooltip":"no address data"}"#);
    }

    #[test]
    fn encoder_that_always_fails_still_produces_a_line() {
        let line = Outcome::Failure(ErrorKind::Serialization, String::from("x")).render_with(|_| Err(Error::NoAddress));
        assert_eq!(line, r#"{"text":"Error","tooltip":"Error while encoding error message"}"#);
    }
}
