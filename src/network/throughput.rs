// SPDX-License-Identifier: MPL-2.0

//! Network throughput sampling
//!
//! Reads the kernel's cumulative byte counters for one interface, waits one
//! sampling interval, reads them again and turns the difference into a
//! KB/s or MB/s rate.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{self, Error, ErrorKind, Result};

/// Above this many KB/s a rate is shown in MB/s instead.
const KB_PER_MB: f64 = 1024.0;
const BYTES_PER_KB: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rx,
    Tx,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rx => "rx",
            Self::Tx => "tx",
        }
    }
}

/// Source of cumulative per-interface byte counters.
pub trait CounterSource {
    async fn read(&self, interface: &str, direction: Direction) -> Result<u64>;
}

/// Counters from `/sys/class/net/<iface>/statistics/<dir>_bytes`.
pub struct SysfsCounters {
    root: PathBuf,
    timeout: Duration,
}

impl SysfsCounters {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.sysfs_net_root.clone(),
            timeout: config.call_timeout,
        }
    }

    fn counter_path(&self, interface: &str, direction: Direction) -> PathBuf {
        self.root
            .join(interface)
            .join("statistics")
            .join(format!("{}_bytes", direction.as_str()))
    }
}

impl CounterSource for SysfsCounters {
    async fn read(&self, interface: &str, direction: Direction) -> Result<u64> {
        let path = self.counter_path(interface, direction);
        error::within(
            self.timeout,
            ErrorKind::OsRead,
            || format!("reading {}", path.display()),
            async {
                let contents = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| Error::OsRead {
                        path: path.clone(),
                        source,
                    })?;
                parse_counter(&path, &contents)
            },
        )
        .await
    }
}

/// Parses a statistics file: one unsigned decimal, optionally followed by a
/// single newline.
fn parse_counter(path: &Path, contents: &str) -> Result<u64> {
    let malformed = || Error::CounterParse {
        path: path.to_path_buf(),
        contents: contents.to_string(),
    };
    let digits = contents.strip_suffix('\n').unwrap_or(contents);
    // u64::from_str would also take a leading '+'
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse().map_err(|_| malformed())
}

/// Both counters of one interface, read back to back.
#[derive(Debug, Clone, Copy)]
pub struct ThroughputSample {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub taken_at: Instant,
}

impl ThroughputSample {
    /// Reads tx first, then rx.
    pub async fn take<C: CounterSource>(source: &C, interface: &str) -> Result<Self> {
        let tx_bytes = source.read(interface, Direction::Tx).await?;
        let rx_bytes = source.read(interface, Direction::Rx).await?;
        Ok(Self {
            rx_bytes,
            tx_bytes,
            taken_at: Instant::now(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    KiloBytesPerSec,
    MegaBytesPerSec,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KiloBytesPerSec => f.write_str("KB/s"),
            Self::MegaBytesPerSec => f.write_str("MB/s"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    pub value: f64,
    pub unit: Unit,
}

impl Rate {
    /// Converts `bytes` moved during `interval` into KB/s, switching to MB/s
    /// past 1024 KB/s. There is no GB/s step.
    pub fn from_bytes(bytes: u64, interval: Duration) -> Self {
        let seconds = interval.as_secs_f64();
        let per_second = if seconds > 0.0 { bytes as f64 / seconds } else { bytes as f64 };
        let kilobytes = per_second / BYTES_PER_KB;

        if kilobytes > KB_PER_MB {
            Self {
                value: kilobytes / KB_PER_MB,
                unit: Unit::MegaBytesPerSec,
            }
        } else {
            Self {
                value: kilobytes,
                unit: Unit::KiloBytesPerSec,
            }
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}{}", self.value, self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub rx: Rate,
    pub tx: Rate,
}

impl Throughput {
    pub fn between(before: &ThroughputSample, after: &ThroughputSample, interval: Duration, interface: &str) -> Self {
        let rx = counter_delta(before.rx_bytes, after.rx_bytes, interface, Direction::Rx);
        let tx = counter_delta(before.tx_bytes, after.tx_bytes, interface, Direction::Tx);
        Self {
            rx: Rate::from_bytes(rx, interval),
            tx: Rate::from_bytes(tx, interval),
        }
    }
}

/// Bytes moved between two readings. A counter that went backwards (reset,
/// interface re-created, wraparound) counts as zero.
fn counter_delta(before: u64, after: u64, interface: &str, direction: Direction) -> u64 {
    after.checked_sub(before).unwrap_or_else(|| {
        log::warn!(
            "{interface}: {} counter went backwards ({before} -> {after}), reporting 0",
            direction.as_str()
        );
        0
    })
}

/// Samples `interface` twice, `interval` apart.
///
/// The wait is the only suspension point of a run and is shared by both
/// directions, so rx and tx are measured over the same window.
pub async fn measure<C: CounterSource>(source: &C, interface: &str, interval: Duration) -> Result<Throughput> {
    let before = ThroughputSample::take(source, interface).await?;
    tokio::time::sleep(interval).await;
    let after = ThroughputSample::take(source, interface).await?;

    log::debug!(
        "{interface}: rx {} -> {}, tx {} -> {} over {:?}",
        before.rx_bytes,
        after.rx_bytes,
        before.tx_bytes,
        after.tx_bytes,
        after.taken_at.duration_since(before.taken_at)
    );

    Ok(Throughput::between(&before, &after, interval, interface))
}
