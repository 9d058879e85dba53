// SPDX-License-Identifier: MPL-2.0

//! Prints the default NetworkManager connection and its current throughput
//! as a single JSON line for status bars such as waybar.
//!
//! One run resolves the default connection over the system bus, samples the
//! interface's kernel byte counters one second apart, prints
//! `{"text": ..., "tooltip": ...}` and exits. Failures are printed in the
//! same shape with `"text": "Error"`; the exit status is always success so
//! the bar never treats the module as crashed.

mod config;
mod error;
mod network;
mod report;

use config::Config;
use error::Result;
use network::{CounterSource, PropertyReader, SysfsCounters, SystemBus};
use report::{Outcome, Report};

/// Resolves the default connection through `reader` and samples its
/// interface through `counters`.
async fn sample<R, C>(reader: &R, counters: &C, config: &Config) -> Result<Report>
where
    R: PropertyReader,
    C: CounterSource,
{
    let connection = network::resolve_default(reader).await?;
    let identity = network::resolve_identity(reader, &connection).await?;
    let throughput = network::measure(counters, &identity.interface, config.sample_interval).await?;
    Ok(Report::new(&identity, &throughput))
}

async fn run(config: &Config) -> Result<Report> {
    let bus = SystemBus::connect(config).await?;
    sample(&bus, &SysfsCounters::new(config), config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout belongs to the bar; logs only appear when RUST_LOG asks for them
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let config = Config::default();
    let outcome = Outcome::from(run(&config).await);
    println!("{}", outcome.render());
}
