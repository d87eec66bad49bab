//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Resolver logic never touches `obs::metrics` directly; all instrumentation
//! flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all};
