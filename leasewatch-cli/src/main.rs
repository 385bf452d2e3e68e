//! ## leasewatch-cli
//! DHCP address-pool utilization monitor entrypoint: live capture on an
//! interface, or replay of a previously captured file.

use clap::Parser;
use leasewatch_telemetry::logging::EventLogger;

mod commands;
mod render;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let cli = Cli::parse();
    commands::run(cli)
}
