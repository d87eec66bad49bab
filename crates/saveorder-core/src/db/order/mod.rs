//! Write-order resolution for related entity graphs.
//!
//! Contract:
//! - Every entity reachable from the roots through recognized relations
//!   appears exactly once in the plan.
//! - Every dependency precedes its dependent, except self-references and
//!   edges dropped under `CyclePolicy::Break`.
//! - With type grouping enabled, same-type entities form contiguous runs.
//!
//! Phases: build the identity-keyed graph, sort it depth-first, then regroup
//! by type depth.

mod depth;
mod graph;
mod plan;
mod sort;
pub mod trace;

use crate::{
    db::session::ResolveSession,
    error::{ErrorClass, InternalError},
    obs::sink::{MetricsEvent, record},
    traits::MetadataProvider,
};
use thiserror::Error as ThisError;
use trace::{ResolveTraceEvent, TracePhase};

pub use depth::Grouping;
pub use plan::{DependencyEdge, DependencyRecord, ResolveStats, ResolvedNode, TypeBatch, WritePlan};

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error(
        "cyclic dependency: {entity_path} depends on {target_path} via relation '{relation}', which already waits on {entity_path}"
    )]
    CyclicDependency {
        entity_path: &'static str,
        relation: &'static str,
        target_path: &'static str,
    },
}

impl ResolveError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::CyclicDependency { .. } => ErrorClass::Conflict,
        }
    }

    /// Entity type on which resolution stopped.
    #[must_use]
    pub const fn entity_path(&self) -> &'static str {
        match self {
            Self::CyclicDependency { entity_path, .. } => *entity_path,
        }
    }
}

/// Resolve the write order for one root set.
pub(crate) fn resolve<M: MetadataProvider>(
    session: &ResolveSession<'_, M>,
    roots: &[M::Entity],
) -> Result<Option<WritePlan<M::Entity>>, InternalError> {
    if roots.is_empty() {
        record(MetricsEvent::ResolveEmpty);
        session.debug_log("resolve: no roots, nothing to write");
        return Ok(None);
    }

    let config = session.resolve_config();
    let root_count = roots.len() as u64;
    record(MetricsEvent::ResolveStart { roots: root_count });
    session.trace(ResolveTraceEvent::Start { roots: root_count });

    // Phase 1: walk the roots and link dependency edges.
    let graph = graph::build(session.metadata(), roots);
    session.trace(ResolveTraceEvent::Phase {
        phase: TracePhase::Build,
        nodes: graph.len() as u64,
    });
    session.debug_log(format!(
        "resolve: built graph roots={} nodes={} edges={} unknown_skipped={}",
        roots.len(),
        graph.len(),
        graph.edge_count(),
        graph.unknown_skipped,
    ));

    // Phase 2: topological sort.
    let topo = match sort::sort(&graph, config.cycle_policy) {
        Ok(topo) => topo,
        Err(err) => {
            record(MetricsEvent::ResolveRejected {
                entity_path: err.entity_path(),
            });
            session.trace(ResolveTraceEvent::Error {
                phase: TracePhase::Sort,
            });
            let err = InternalError::from(err);
            session.debug_log(format!(
                "resolve: rejected [{}:{}] {}",
                err.origin, err.class, err.message
            ));

            return Err(err);
        }
    };
    session.trace(ResolveTraceEvent::Phase {
        phase: TracePhase::Sort,
        nodes: topo.order.len() as u64,
    });
    if topo.cycles_broken() > 0 {
        session.debug_log(format!(
            "resolve: broke {} dependency cycle pair(s)",
            topo.cycles_broken()
        ));
    }

    // Phase 3: regroup by type depth, or keep the raw order.
    let (order, grouping) = if config.group_by_type {
        depth::group_by_type(&graph, &topo)
    } else {
        (topo.order.clone(), Grouping::TopologicalOnly)
    };
    if grouping == Grouping::GreedyBatches {
        record(MetricsEvent::GroupingFallback);
        session.debug_log("resolve: type-depth grouping split a dependency, used greedy batches");
    }
    session.trace(ResolveTraceEvent::Phase {
        phase: TracePhase::Group,
        nodes: order.len() as u64,
    });

    let plan = WritePlan::from_graph(graph, &topo, &order, grouping);
    for node in plan.iter() {
        record(MetricsEvent::NodeResolved {
            entity_path: node.model.path,
        });
    }
    for batch in plan.batches() {
        record(MetricsEvent::BatchEmitted {
            entity_path: batch.entity_path(),
        });
    }

    let stats = plan.stats();
    record(MetricsEvent::ResolveFinish {
        nodes: stats.nodes as u64,
        edges: stats.edges as u64,
        batches: stats.batches as u64,
    });
    session.trace(ResolveTraceEvent::Finish {
        nodes: stats.nodes as u64,
        batches: stats.batches as u64,
    });
    session.debug_log(format!(
        "resolve: done nodes={} batches={} grouping={:?}",
        stats.nodes, stats.batches, stats.grouping,
    ));

    Ok(Some(plan))
}
