//! Capture source configuration.
//!
//! Selects between a live interface and a pcap replay file. Exactly one of
//! the two must be set; the struct-level check enforces it before the
//! capture layer is ever reached.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation;

/// Packet capture configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validate_source_choice))]
pub struct CaptureConfig {
    /// Network interface for live capture.
    #[validate(custom(function = validation::validate_interface))]
    #[serde(default)]
    pub interface: Option<String>,

    /// Previously captured frame sequence to replay instead of listening.
    #[serde(default)]
    pub replay_file: Option<PathBuf>,

    /// Run the interface in promiscuous mode?
    #[serde(default = "default_promiscuous")]
    pub promiscuous: bool,

    /// Per-frame capture length in bytes.
    #[validate(range(min = 576, max = 262144))]
    #[serde(default = "default_snaplen")]
    pub snaplen: i32,

    /// Bounded wait per read (milliseconds); keeps the cancellation flag
    /// responsive on a quiet interface.
    #[validate(range(min = 1, max = 60000))]
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: i32,
}

fn default_promiscuous() -> bool {
    true
}

fn default_snaplen() -> i32 {
    65535
}

fn default_read_timeout() -> i32 {
    1000
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interface: None,
            replay_file: None,
            promiscuous: default_promiscuous(),
            snaplen: default_snaplen(),
            read_timeout_ms: default_read_timeout(),
        }
    }
}

fn validate_source_choice(config: &CaptureConfig) -> Result<(), ValidationError> {
    match (&config.interface, &config.replay_file) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (None, None) => {
            let mut err = ValidationError::new("no_capture_source");
            err.message = Some("either an interface or a replay file is required".into());
            Err(err)
        }
        (Some(_), Some(_)) => {
            let mut err = ValidationError::new("conflicting_capture_sources");
            err.message = Some("an interface and a replay file are mutually exclusive".into());
            Err(err)
        }
    }
}
