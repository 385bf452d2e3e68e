use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ipnetwork::Ipv4Network;

use leasewatch_config::{CaptureConfig, LeasewatchConfig, MonitorConfig};
use leasewatch_engine::run_monitor;
use leasewatch_telemetry::MetricsRecorder;

use crate::render::TableRenderer;

#[derive(Parser, Debug)]
#[command(name = "leasewatch", version, about = "DHCP address-pool utilization monitor")]
pub struct Cli {
    /// Interface on which to listen for DHCP traffic
    #[arg(
        short,
        long,
        value_name = "INTERFACE",
        conflicts_with = "replay_file",
        required_unless_present = "replay_file"
    )]
    pub interface: Option<String>,

    /// Previously captured pcap file to replay instead of listening
    #[arg(short = 'r', long = "read", value_name = "FILE", conflicts_with = "interface")]
    pub replay_file: Option<PathBuf>,

    /// Network prefixes to generate statistics for (e.g. 192.168.1.0/24)
    #[arg(required = true, value_name = "IP-PREFIX")]
    pub prefixes: Vec<Ipv4Network>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let capture = CaptureConfig {
        interface: cli.interface,
        replay_file: cli.replay_file,
        ..CaptureConfig::default()
    };
    let monitor = MonitorConfig {
        prefixes: cli.prefixes,
        ..MonitorConfig::default()
    };
    let config = LeasewatchConfig::new(capture, monitor)?;

    // SIGINT flips the flag; the capture loop notices it at the top of the
    // next iteration and tears down through the normal path.
    let terminate = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&terminate);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))
        .context("failed to install the termination handler")?;

    let metrics = MetricsRecorder::new();
    let mut renderer = TableRenderer::new();
    let outcome = run_monitor(&config, &terminate, &metrics, |snapshot| {
        renderer.render(snapshot)
    })?;
    tracing::info!(?outcome, "monitor stopped");
    Ok(())
}
