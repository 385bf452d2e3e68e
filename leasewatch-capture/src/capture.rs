//! Source management and the blocking receive loop.
//!
//! Exactly one source is opened per run: a live interface or a pcap replay
//! file. The DHCP port filter is attached to either kind before the first
//! read, and the handle (with its compiled filter) is dropped on every exit
//! path.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use pcap::{Activated, Active, Capture, Device, Offline};
use thiserror::Error;
use tracing::{debug, info};

use crate::packet::Packet;

/// Coarse filter selecting the two well-known DHCP transport ports.
pub const DHCP_PORT_FILTER: &str = "udp port 67 or udp port 68";

/// Errors raised while opening a source or pulling frames from it.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no capture source: exactly one of interface or replay file must be configured")]
    NoSource,
    #[error("capture device '{0}' not found")]
    DeviceNotFound(String),
    #[error("failed to open capture source '{source}'")]
    SourceOpen {
        source: String,
        #[source]
        cause: pcap::Error,
    },
    #[error("failed to compile or attach the capture filter")]
    Filter(#[source] pcap::Error),
    #[error("capture driver failure")]
    Driver(#[source] pcap::Error),
}

/// How a capture run ended cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The replay file was exhausted.
    EndOfReplay,
    /// The cancellation flag was observed at the top of an iteration.
    Cancelled,
}

/// Knobs for live capture; replay sources ignore them.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub promiscuous: bool,
    pub snaplen: i32,
    /// Bounded wait per read, so the cancellation flag is re-checked even on
    /// a quiet interface.
    pub read_timeout_ms: i32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            promiscuous: true,
            snaplen: 65535,
            read_timeout_ms: 1000,
        }
    }
}

/// Opens exactly one capture source and attaches the DHCP port filter.
///
/// Supplying both an interface and a replay file, or neither, is a
/// configuration error the argument layer normally catches; this is the
/// fail-fast backstop.
pub fn open_source(
    interface: Option<&str>,
    replay_file: Option<&Path>,
    options: &CaptureOptions,
) -> Result<Capture<dyn Activated>, CaptureError> {
    let mut capture: Capture<dyn Activated> = match (interface, replay_file) {
        (Some(name), None) => open_live(name, options)?.into(),
        (None, Some(path)) => open_replay(path)?.into(),
        _ => return Err(CaptureError::NoSource),
    };
    capture
        .filter(DHCP_PORT_FILTER, true)
        .map_err(CaptureError::Filter)?;
    Ok(capture)
}

fn open_live(name: &str, options: &CaptureOptions) -> Result<Capture<Active>, CaptureError> {
    let device = Device::list()
        .map_err(|cause| CaptureError::SourceOpen {
            source: name.to_string(),
            cause,
        })?
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| CaptureError::DeviceNotFound(name.to_string()))?;

    info!("Opening live capture on interface: {}", name);
    Capture::from_device(device)
        .and_then(|inactive| {
            inactive
                .promisc(options.promiscuous)
                .snaplen(options.snaplen)
                .timeout(options.read_timeout_ms)
                .open()
        })
        .map_err(|cause| CaptureError::SourceOpen {
            source: name.to_string(),
            cause,
        })
}

fn open_replay(path: &Path) -> Result<Capture<Offline>, CaptureError> {
    info!("Opening replay capture from file: {}", path.display());
    Capture::from_file(path).map_err(|cause| CaptureError::SourceOpen {
        source: path.display().to_string(),
        cause,
    })
}

/// Pulls frames until cancellation, replay exhaustion, or a driver failure.
///
/// A read timeout on a quiet live interface is not an event; the loop just
/// re-checks the cancellation flag and blocks again. The handle and its
/// filter program are released when `capture` drops, on every path.
pub fn run_capture_loop<F>(
    mut capture: Capture<dyn Activated>,
    terminate: &AtomicBool,
    mut callback: F,
) -> Result<CaptureOutcome, CaptureError>
where
    F: FnMut(&Packet),
{
    while !terminate.load(Ordering::Relaxed) {
        match capture.next_packet() {
            Ok(frame) => {
                debug!("Captured frame, length: {}", frame.header.caplen);
                callback(&Packet::new(frame.data.to_vec()));
            }
            Err(pcap::Error::TimeoutExpired) => continue,
            Err(pcap::Error::NoMorePackets) => return Ok(CaptureOutcome::EndOfReplay),
            Err(e) => return Err(CaptureError::Driver(e)),
        }
    }
    Ok(CaptureOutcome::Cancelled)
}
