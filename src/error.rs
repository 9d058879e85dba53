// SPDX-License-Identifier: MPL-2.0

//! Error types shared by every stage of a run.
//!
//! Every error is fatal to the run. The only recovery is to render it as the
//! output payload, which `report` does.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failure, independent of its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BusCommunication,
    NotFound,
    NoAddress,
    OsRead,
    Serialization,
}

#[derive(Debug, Error)]
pub enum Error {
    // ── Bus ─────────────────────────────────────────────────────────
    #[error("connecting to the system bus failed: {0}")]
    Connect(String),

    /// A property read failed on the bus (service gone, object vanished,
    /// property missing).
    #[error("{object}: reading {property} failed: {message}")]
    Bus {
        object: String,
        property: String,
        message: String,
    },

    /// The property arrived but does not have the expected shape.
    #[error("{object}: unexpected value for {property}: {message}")]
    Decode {
        object: String,
        property: String,
        message: String,
    },

    /// A bus call or counter read did not complete in time.
    #[error("{what} timed out after {}ms", .after.as_millis())]
    Timeout {
        what: String,
        after: Duration,
        kind: ErrorKind,
    },

    // ── Resolution ──────────────────────────────────────────────────
    #[error("{0}")]
    NotFound(String),

    #[error("no address data")]
    NoAddress,

    // ── Statistics files ────────────────────────────────────────────
    #[error("{}: {source}", .path.display())]
    OsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid counter {contents:?}", .path.display())]
    CounterParse { path: PathBuf, contents: String },

    // ── Output ──────────────────────────────────────────────────────
    #[error("encoding output failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn bus(object: impl Into<String>, property: &str, err: impl std::fmt::Display) -> Self {
        Self::Bus {
            object: object.into(),
            property: property.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(object: impl Into<String>, property: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            object: object.into(),
            property: property.to_string(),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect(_) | Self::Bus { .. } | Self::Decode { .. } => ErrorKind::BusCommunication,
            Self::Timeout { kind, .. } => *kind,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoAddress => ErrorKind::NoAddress,
            Self::OsRead { .. } | Self::CounterParse { .. } => ErrorKind::OsRead,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

/// Runs `fut`, failing with [`Error::Timeout`] if it does not finish within
/// `after`. `what` is only evaluated on expiry.
pub async fn within<T>(
    after: Duration,
    kind: ErrorKind,
    what: impl FnOnce() -> String,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            what: what(),
            after,
            kind,
        }),
    }
}
