//! # Leasewatch Capture
//!
//! Provides a unified capture interface over live interfaces and pcap
//! replay files, plus the blocking receive loop that drives the monitor.

pub mod capture;
pub mod packet;

pub use capture::{open_source, run_capture_loop, CaptureError, CaptureOptions, CaptureOutcome};
pub use packet::Packet;
