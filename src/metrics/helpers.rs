//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    BROADCAST_LATENCY, CHANNELS_ACTIVE, COMMANDS_TOTAL, NOTIFICATIONS_FAILED_TOTAL,
    NOTIFICATIONS_TOTAL, REJECTIONS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording validation chain metrics
pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record a command that passed every stage of an accept-only chain
    pub fn record_accepted() {
        COMMANDS_TOTAL.with_label_values(&["accepted"]).inc();
    }

    /// Record a command that passed every stage and was delivered
    pub fn record_delivered() {
        COMMANDS_TOTAL.with_label_values(&["delivered"]).inc();
    }

    /// Record a command rejected by `stage`
    pub fn record_rejected(stage: &str) {
        COMMANDS_TOTAL.with_label_values(&["rejected"]).inc();
        REJECTIONS_TOTAL.with_label_values(&[stage]).inc();
    }
}

/// Helper struct for recording broadcast metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_broadcast(notified: u64, failed: u64, elapsed: Duration) {
        NOTIFICATIONS_TOTAL.inc_by(notified);
        NOTIFICATIONS_FAILED_TOTAL.inc_by(failed);
        BROADCAST_LATENCY.observe(elapsed.as_secs_f64());
    }
}

/// Helper struct for registry metrics
pub struct ChannelMetrics;

impl ChannelMetrics {
    pub fn set_active(count: usize) {
        CHANNELS_ACTIVE.set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_metrics() {
        PipelineMetrics::record_rejected("non_empty");
        DeliveryMetrics::record_broadcast(2, 0, Duration::from_micros(10));

        let text = encode_metrics().unwrap();
        assert!(text.contains("dispatch_rejections_total"));
        assert!(text.contains("dispatch_notifications_total"));
    }
}
