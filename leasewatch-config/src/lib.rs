//! # Leasewatch Configuration System
//!
//! Typed configuration for the monitor, assembled by the CLI from command
//! line arguments and validated before any capture source is touched.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use validator::Validate;

mod capture;
mod error;
mod monitor;
mod validation;

pub use capture::CaptureConfig;
pub use error::ConfigError;
pub use monitor::MonitorConfig;

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct LeasewatchConfig {
    /// Capture source selection and read parameters.
    #[validate(nested)]
    pub capture: CaptureConfig,

    /// Monitored prefixes and alerting thresholds.
    #[validate(nested)]
    pub monitor: MonitorConfig,
}

impl LeasewatchConfig {
    /// Assembles and validates a configuration. Surfaced before any capture
    /// attempt; a failure here is fatal and not retried.
    pub fn new(capture: CaptureConfig, monitor: MonitorConfig) -> Result<Self, ConfigError> {
        let config = Self { capture, monitor };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_monitor() -> MonitorConfig {
        MonitorConfig {
            prefixes: vec!["192.168.1.0/24".parse().unwrap()],
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn interface_source_validates() {
        let capture = CaptureConfig {
            interface: Some("eth0".into()),
            ..CaptureConfig::default()
        };
        LeasewatchConfig::new(capture, valid_monitor()).expect("config should validate");
    }

    #[test]
    fn replay_source_validates() {
        let capture = CaptureConfig {
            replay_file: Some(PathBuf::from("frames.pcap")),
            ..CaptureConfig::default()
        };
        LeasewatchConfig::new(capture, valid_monitor()).expect("config should validate");
    }

    #[test]
    fn missing_source_is_rejected() {
        assert!(LeasewatchConfig::new(CaptureConfig::default(), valid_monitor()).is_err());
    }

    #[test]
    fn conflicting_sources_are_rejected() {
        let capture = CaptureConfig {
            interface: Some("eth0".into()),
            replay_file: Some(PathBuf::from("frames.pcap")),
            ..CaptureConfig::default()
        };
        assert!(LeasewatchConfig::new(capture, valid_monitor()).is_err());
    }

    #[test]
    fn empty_prefix_list_is_rejected() {
        let capture = CaptureConfig {
            interface: Some("eth0".into()),
            ..CaptureConfig::default()
        };
        let monitor = MonitorConfig::default();
        assert!(LeasewatchConfig::new(capture, monitor).is_err());
    }
}
