//! Prometheus counters for the capture pipeline.

use prometheus::{Counter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    /// Frames delivered by the capture source, relevant or not.
    pub captured_frames: Counter,
    /// ACK/RELEASE events applied to the registry.
    pub lease_events: Counter,
    /// Frames skipped because the captured length was too short.
    pub truncated_frames: Counter,
    /// One-shot utilization alerts raised.
    pub utilization_alerts: Counter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let captured_frames =
            Counter::new("leasewatch_captured_frames_total", "Frames pulled from the source")
                .unwrap();
        let lease_events = Counter::new(
            "leasewatch_lease_events_total",
            "Lease assignments and releases applied",
        )
        .unwrap();
        let truncated_frames = Counter::new(
            "leasewatch_truncated_frames_total",
            "Frames skipped as undersized",
        )
        .unwrap();
        let utilization_alerts = Counter::new(
            "leasewatch_utilization_alerts_total",
            "Prefix utilization threshold crossings",
        )
        .unwrap();

        registry.register(Box::new(captured_frames.clone())).unwrap();
        registry.register(Box::new(lease_events.clone())).unwrap();
        registry.register(Box::new(truncated_frames.clone())).unwrap();
        registry
            .register(Box::new(utilization_alerts.clone()))
            .unwrap();

        Self {
            registry,
            captured_frames,
            lease_events,
            truncated_frames,
            utilization_alerts,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_appear_in_gathered_output() {
        let metrics = MetricsRecorder::new();
        metrics.captured_frames.inc();
        metrics.lease_events.inc();
        let rendered = metrics.gather_metrics().unwrap();
        assert!(rendered.contains("leasewatch_captured_frames_total 1"));
        assert!(rendered.contains("leasewatch_lease_events_total 1"));
    }
}
