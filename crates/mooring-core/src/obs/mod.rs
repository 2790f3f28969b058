//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Join, populate, integrate and schema resolution never touch metrics state
//! directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{AliasCounters, EventOps, EventReport};
pub use sink::{
    MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, record, with_metrics_sink,
};
