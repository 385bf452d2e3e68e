//! The monitor runtime.
//!
//! Single-threaded and blocking: the capture loop owns the thread, and the
//! registry is mutated only from inside it. Every render-callback invocation
//! therefore observes the registry state for exactly the prefix of the event
//! stream processed so far.

use std::sync::atomic::AtomicBool;

use tracing::{info, warn};

use leasewatch_capture::{open_source, run_capture_loop, CaptureOptions, CaptureOutcome, Packet};
use leasewatch_config::LeasewatchConfig;
use leasewatch_monitor::{PrefixRegistry, PrefixSnapshot};
use leasewatch_protocols::{DhcpParseError, DhcpParser, MessageKind};
use leasewatch_telemetry::MetricsRecorder;

use crate::error::EngineError;

/// Runs the monitor until cancellation, replay exhaustion, or a driver
/// failure. The render callback fires once on startup and then after every
/// registry mutation.
pub fn run_monitor<F>(
    config: &LeasewatchConfig,
    terminate: &AtomicBool,
    metrics: &MetricsRecorder,
    mut render: F,
) -> Result<CaptureOutcome, EngineError>
where
    F: FnMut(&[PrefixSnapshot]),
{
    let mut registry =
        PrefixRegistry::new(&config.monitor.prefixes, config.monitor.alert_threshold);
    let parser = DhcpParser::new();
    let threshold = config.monitor.alert_threshold;

    let options = CaptureOptions {
        promiscuous: config.capture.promiscuous,
        snaplen: config.capture.snaplen,
        read_timeout_ms: config.capture.read_timeout_ms,
    };
    let capture = open_source(
        config.capture.interface.as_deref(),
        config.capture.replay_file.as_deref(),
        &options,
    )?;

    render(&registry.snapshot());

    let outcome = run_capture_loop(capture, terminate, |packet: &Packet| {
        metrics.captured_frames.inc();
        match parser.parse(&packet.data) {
            Ok(Some(event)) => match event.kind {
                MessageKind::Ack => {
                    for alert in registry.allocate(event.client_address) {
                        warn!(
                            prefix = %alert.address,
                            mask = alert.mask,
                            utilization = alert.utilization,
                            threshold,
                            "prefix exceeded utilization threshold"
                        );
                        metrics.utilization_alerts.inc();
                    }
                    metrics.lease_events.inc();
                    render(&registry.snapshot());
                }
                MessageKind::Release => {
                    registry.release(event.client_address);
                    metrics.lease_events.inc();
                    render(&registry.snapshot());
                }
                MessageKind::Other(_) => {}
            },
            Ok(None) => {}
            Err(DhcpParseError::TruncatedFrame { need, got }) => {
                // Undersized captures are skipped; the session keeps running.
                metrics.truncated_frames.inc();
                warn!(need, got, "skipping undersized captured frame");
            }
        }
    })?;

    info!(?outcome, "capture loop finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcap::{Capture, Linktype, PacketHeader};
    use std::path::Path;

    use leasewatch_config::{CaptureConfig, MonitorConfig};

    const MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

    /// Full Ethernet/IPv4/UDP/BOOTP frame carrying a message-type option.
    fn dhcp_frame(message_type: u8, yiaddr: [u8; 4]) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&[0u8; 12]);
        frame.extend_from_slice(&[0x08, 0x00]);
        let options = [53u8, 1, message_type, 255];
        let total_len = (20 + 8 + 236 + 4 + options.len()) as u16;
        let mut ip = [0u8; 20];
        ip[0] = 0x45;
        ip[2..4].copy_from_slice(&total_len.to_be_bytes());
        ip[8] = 64;
        ip[9] = 17;
        frame.extend_from_slice(&ip);
        frame.extend_from_slice(&67u16.to_be_bytes());
        frame.extend_from_slice(&68u16.to_be_bytes());
        frame.extend_from_slice(&((8 + 236 + 4 + options.len()) as u16).to_be_bytes());
        frame.extend_from_slice(&[0, 0]);
        let mut bootp = vec![0u8; 236];
        bootp[0] = 2;
        bootp[16..20].copy_from_slice(&yiaddr);
        frame.extend_from_slice(&bootp);
        frame.extend_from_slice(&MAGIC_COOKIE);
        frame.extend_from_slice(&options);
        frame
    }

    fn write_savefile(path: &Path, frames: &[Vec<u8>]) {
        let dead = Capture::dead(Linktype::ETHERNET).unwrap();
        let mut savefile = dead.savefile(path).unwrap();
        for data in frames {
            let header = PacketHeader {
                ts: libc::timeval {
                    tv_sec: 0,
                    tv_usec: 0,
                },
                caplen: data.len() as u32,
                len: data.len() as u32,
            };
            savefile.write(&pcap::Packet::new(&header, data));
        }
        savefile.flush().unwrap();
    }

    fn replay_config(path: &Path) -> LeasewatchConfig {
        let capture = CaptureConfig {
            replay_file: Some(path.to_path_buf()),
            ..CaptureConfig::default()
        };
        let monitor = MonitorConfig {
            prefixes: vec!["192.168.1.0/24".parse().unwrap()],
            ..MonitorConfig::default()
        };
        LeasewatchConfig::new(capture, monitor).unwrap()
    }

    #[test]
    fn replay_drives_registry_and_render_callback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leases.pcap");
        write_savefile(
            &path,
            &[
                dhcp_frame(5, [192, 168, 1, 10]), // ACK
                dhcp_frame(5, [192, 168, 1, 11]), // ACK
                dhcp_frame(1, [0, 0, 0, 0]),      // DISCOVER, ignored
                dhcp_frame(7, [192, 168, 1, 10]), // RELEASE
            ],
        );

        let config = replay_config(&path);
        let metrics = MetricsRecorder::new();
        let terminate = AtomicBool::new(false);
        let mut renders = Vec::new();
        let outcome = run_monitor(&config, &terminate, &metrics, |snapshot| {
            renders.push(snapshot[0].allocated);
        })
        .unwrap();

        assert_eq!(outcome, CaptureOutcome::EndOfReplay);
        // Startup render plus one per applied lease event.
        assert_eq!(renders, vec![0, 1, 2, 1]);
        assert_eq!(metrics.lease_events.get(), 3.0);
        assert_eq!(metrics.captured_frames.get(), 4.0);
    }

    #[test]
    fn truncated_frames_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leases.pcap");
        let mut short = dhcp_frame(5, [192, 168, 1, 10]);
        short.truncate(60);
        write_savefile(&path, &[short, dhcp_frame(5, [192, 168, 1, 11])]);

        let config = replay_config(&path);
        let metrics = MetricsRecorder::new();
        let terminate = AtomicBool::new(false);
        let mut last = Vec::new();
        let outcome = run_monitor(&config, &terminate, &metrics, |snapshot| {
            last = snapshot.to_vec();
        })
        .unwrap();

        assert_eq!(outcome, CaptureOutcome::EndOfReplay);
        assert_eq!(metrics.truncated_frames.get(), 1.0);
        assert_eq!(last[0].allocated, 1);
    }

    #[test]
    fn missing_source_surfaces_as_capture_error() {
        // Bypasses config validation on purpose: the capture layer is the
        // fail-fast backstop.
        let config = LeasewatchConfig {
            capture: CaptureConfig::default(),
            monitor: MonitorConfig {
                prefixes: vec!["192.168.1.0/24".parse().unwrap()],
                ..MonitorConfig::default()
            },
        };
        let metrics = MetricsRecorder::new();
        let terminate = AtomicBool::new(false);
        let err = run_monitor(&config, &terminate, &metrics, |_| {}).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Capture(leasewatch_capture::CaptureError::NoSource)
        ));
    }
}
