//! Structured logging initialization.
//!
//! One `tracing` subscriber for the whole process, filtered through the
//! usual `RUST_LOG` conventions. Alert notifications are ordinary `warn!`
//! events with structured fields, so any downstream sink (journal, syslog
//! forwarder) sees them without special plumbing.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Call once, before any capture setup.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init()
    }
}
