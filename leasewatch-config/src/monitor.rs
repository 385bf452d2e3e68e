//! Monitored prefixes and alerting thresholds.

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Monitoring configuration parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct MonitorConfig {
    /// Prefixes whose utilization is tracked. Overlaps are allowed; each
    /// prefix is accounted independently.
    #[validate(
        length(min = 1, message = "at least one prefix is required"),
        custom(function = validation::validate_prefix_list)
    )]
    #[serde(default)]
    pub prefixes: Vec<Ipv4Network>,

    /// Utilization percentage at which the one-shot alert fires.
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f32,
}

fn default_alert_threshold() -> f32 {
    50.0
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            prefixes: Vec::new(),
            alert_threshold: default_alert_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prefixes(prefixes: &[&str]) -> MonitorConfig {
        MonitorConfig {
            prefixes: prefixes.iter().map(|p| p.parse().unwrap()).collect(),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn valid_prefix_list_passes() {
        with_prefixes(&["10.0.0.0/16", "10.0.1.0/24"])
            .validate()
            .expect("overlapping prefixes are allowed");
    }

    #[test]
    fn zero_length_mask_is_rejected() {
        assert!(with_prefixes(&["0.0.0.0/0"]).validate().is_err());
    }

    #[test]
    fn unspecified_network_address_is_rejected() {
        assert!(with_prefixes(&["0.0.0.0/8"]).validate().is_err());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut config = with_prefixes(&["10.0.0.0/24"]);
        config.alert_threshold = 0.0;
        assert!(config.validate().is_err());
        config.alert_threshold = 150.0;
        assert!(config.validate().is_err());
    }
}
