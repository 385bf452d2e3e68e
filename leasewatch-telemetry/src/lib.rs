//! # Leasewatch Telemetry
//!
//! Crate for logging initialization and process metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
