//! Prometheus metrics for the dispatch pipeline.
//!
//! - Command metrics (handled commands by outcome, rejections by stage)
//! - Delivery metrics (notifications sent, broadcast latency)
//! - Registry metrics (active channels)

mod helpers;

pub use helpers::{encode_metrics, ChannelMetrics, DeliveryMetrics, PipelineMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "dispatch";

lazy_static! {
    // ============================================================================
    // Pipeline Metrics
    // ============================================================================

    /// Commands handled by a validation chain, by outcome
    pub static ref COMMANDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_commands_total", METRIC_PREFIX),
        "Total commands handled by a validation chain",
        &["outcome"]
    ).unwrap();

    /// Rejections by the stage that produced them
    pub static ref REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_rejections_total", METRIC_PREFIX),
        "Total commands rejected, by stage",
        &["stage"]
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Recipient notifications performed by broadcasts
    pub static ref NOTIFICATIONS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_notifications_total", METRIC_PREFIX),
        "Total recipient notifications performed"
    ).unwrap();

    /// Recipient notifications that panicked during parallel fan-out
    pub static ref NOTIFICATIONS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_notifications_failed_total", METRIC_PREFIX),
        "Total recipient notifications that failed"
    ).unwrap();

    /// Time taken by a whole broadcast
    pub static ref BROADCAST_LATENCY: Histogram = register_histogram!(
        format!("{}_broadcast_latency_seconds", METRIC_PREFIX),
        "Broadcast latency in seconds",
        vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).unwrap();

    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Channels currently registered
    pub static ref CHANNELS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_channels_active", METRIC_PREFIX),
        "Total number of registered channels"
    ).unwrap();
}
