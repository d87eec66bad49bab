//! Metrics sink boundary.
//!
//! Resolver logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between ordering logic
//! and the thread-local metrics state.
use crate::obs::metrics::{self, EventReport};
use std::cell::Cell;

thread_local! {
    static SINK_OVERRIDE: Cell<Option<&'static dyn MetricsSink>> = const { Cell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ResolveStart {
        roots: u64,
    },
    ResolveFinish {
        nodes: u64,
        edges: u64,
        batches: u64,
    },
    ResolveEmpty,
    ResolveRejected {
        entity_path: &'static str,
    },
    NodeResolved {
        entity_path: &'static str,
    },
    BatchEmitted {
        entity_path: &'static str,
    },
    UnknownTypeSkipped,
    CycleBroken {
        entity_path: &'static str,
    },
    GroupingFallback,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ResolveStart { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.resolve_calls = m.ops.resolve_calls.saturating_add(1);
                });
            }

            MetricsEvent::ResolveFinish {
                nodes,
                edges,
                batches,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.nodes_resolved = m.ops.nodes_resolved.saturating_add(nodes);
                    m.ops.edges_linked = m.ops.edges_linked.saturating_add(edges);
                    m.ops.batches_emitted = m.ops.batches_emitted.saturating_add(batches);
                });
            }

            MetricsEvent::ResolveEmpty => {
                metrics::with_state_mut(|m| {
                    m.ops.resolve_calls = m.ops.resolve_calls.saturating_add(1);
                    m.ops.empty_resolves = m.ops.empty_resolves.saturating_add(1);
                });
            }

            MetricsEvent::ResolveRejected { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.rejected_resolves = m.ops.rejected_resolves.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.cycles_rejected = entry.cycles_rejected.saturating_add(1);
                });
            }

            MetricsEvent::NodeResolved { entity_path } => {
                metrics::with_state_mut(|m| {
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.nodes_resolved = entry.nodes_resolved.saturating_add(1);
                });
            }

            MetricsEvent::BatchEmitted { entity_path } => {
                metrics::with_state_mut(|m| {
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.batches_emitted = entry.batches_emitted.saturating_add(1);
                });
            }

            MetricsEvent::UnknownTypeSkipped => {
                metrics::with_state_mut(|m| {
                    m.ops.unknown_types_skipped = m.ops.unknown_types_skipped.saturating_add(1);
                });
            }

            MetricsEvent::CycleBroken { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cycles_broken = m.ops.cycles_broken.saturating_add(1);
                });
            }

            MetricsEvent::GroupingFallback => {
                metrics::with_state_mut(|m| {
                    m.ops.grouping_fallbacks = m.ops.grouping_fallbacks.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    match SINK_OVERRIDE.with(Cell::get) {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub(crate) fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| cell.set(self.0));
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.replace(Some(sink)));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
