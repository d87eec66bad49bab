//! Depth annotation and type grouping.
//!
//! `depth(e)` is 0 when nothing depends on `e`, otherwise one more than the
//! deepest dependent. Types are emitted as contiguous runs ordered by their
//! deepest member, which keeps one write batch per type.

use crate::{
    db::order::{
        graph::{DependencyGraph, NodeId},
        sort::TopologicalOrder,
    },
    traits::EntityHandle,
};
use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
};

///
/// Grouping
///
/// How the final order was derived from the topological order.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Grouping {
    /// Contiguous type runs ordered by descending type depth.
    TypeDepth,
    /// Type runs could not be ordered without splitting; types were batched
    /// greedily while keeping every dependency ahead of its dependent.
    GreedyBatches,
    /// Raw topological order, no regrouping requested.
    TopologicalOnly,
}

/// Per-node depth, computed by scanning the topological order backwards.
pub(crate) fn node_depths<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    topo: &TopologicalOrder,
) -> Vec<usize> {
    let mut depths = vec![0usize; graph.len()];

    for &node in topo.order.iter().rev() {
        // Dependents placed earlier only reach this node through a broken cycle.
        let depth = graph.nodes[node]
            .dependents
            .iter()
            .filter(|edge| topo.honors(edge.node, node))
            .map(|edge| depths[edge.node] + 1)
            .max()
            .unwrap_or(0);
        depths[node] = depth;
    }

    depths
}

/// Maximum node depth per entity path.
pub(crate) fn type_depths<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    depths: &[usize],
) -> BTreeMap<&'static str, usize> {
    let mut by_type = BTreeMap::new();
    for (node, &depth) in depths.iter().enumerate() {
        let entry = by_type.entry(graph.path_of(node)).or_insert(0);
        *entry = (*entry).max(depth);
    }

    by_type
}

/// Regroup the topological order by type.
pub(crate) fn group_by_type<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    topo: &TopologicalOrder,
) -> (Vec<NodeId>, Grouping) {
    let depths = node_depths(graph, topo);
    let type_depths = type_depths(graph, &depths);

    let grouped = type_depth_order(graph, topo, &type_depths);
    if respects_honored_edges(graph, topo, &grouped) {
        return (grouped, Grouping::TypeDepth);
    }

    (
        greedy_type_batches(graph, topo, &type_depths),
        Grouping::GreedyBatches,
    )
}

// Stable grouping: types in order of first appearance, then sorted by
// descending depth; members keep their topological order.
fn type_depth_order<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    topo: &TopologicalOrder,
    type_depths: &BTreeMap<&'static str, usize>,
) -> Vec<NodeId> {
    let mut groups: Vec<(&'static str, Vec<NodeId>)> = Vec::new();
    let mut slots: BTreeMap<&'static str, usize> = BTreeMap::new();

    for &node in &topo.order {
        let path = graph.path_of(node);
        let slot = *slots.entry(path).or_insert_with(|| {
            groups.push((path, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(node);
    }

    groups.sort_by_key(|(path, _)| Reverse(type_depths.get(path).copied().unwrap_or(0)));

    groups.into_iter().flat_map(|(_, nodes)| nodes).collect()
}

// Check that every edge the topological order honors is still honored.
fn respects_honored_edges<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    topo: &TopologicalOrder,
    candidate: &[NodeId],
) -> bool {
    let mut position = vec![0usize; candidate.len()];
    for (index, &node) in candidate.iter().enumerate() {
        position[node] = index;
    }

    graph.nodes.iter().enumerate().all(|(node, entry)| {
        entry
            .depends_on
            .iter()
            .filter(|edge| topo.honors(node, edge.node))
            .all(|edge| position[edge.node] < position[node])
    })
}

// Kahn's algorithm over honored edges. Prefer staying on the current type;
// otherwise open the deepest ready type. Ties go to topological position.
fn greedy_type_batches<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    topo: &TopologicalOrder,
    type_depths: &BTreeMap<&'static str, usize>,
) -> Vec<NodeId> {
    let len = graph.len();
    let mut waiting = vec![0usize; len];
    let mut unblocks: Vec<Vec<NodeId>> = vec![Vec::new(); len];

    for (node, entry) in graph.nodes.iter().enumerate() {
        let dependencies: BTreeSet<NodeId> = entry
            .depends_on
            .iter()
            .map(|edge| edge.node)
            .filter(|&dependency| topo.honors(node, dependency))
            .collect();

        waiting[node] = dependencies.len();
        for dependency in dependencies {
            unblocks[dependency].push(node);
        }
    }

    // Ready nodes keyed by topological position.
    let mut ready: BTreeSet<usize> = (0..len)
        .filter(|&node| waiting[node] == 0)
        .map(|node| topo.position[node])
        .collect();

    let mut out = Vec::with_capacity(len);
    let mut current: Option<&'static str> = None;

    while !ready.is_empty() {
        let same_type = current.and_then(|path| {
            ready
                .iter()
                .copied()
                .find(|&pos| graph.path_of(topo.order[pos]) == path)
        });

        let pos = same_type.or_else(|| {
            ready.iter().copied().min_by_key(|&pos| {
                let path = graph.path_of(topo.order[pos]);
                (Reverse(type_depths.get(path).copied().unwrap_or(0)), pos)
            })
        });
        let Some(pos) = pos else {
            break;
        };

        ready.remove(&pos);
        let node = topo.order[pos];
        current = Some(graph.path_of(node));
        out.push(node);

        for &dependent in &unblocks[node] {
            waiting[dependent] -= 1;
            if waiting[dependent] == 0 {
                ready.insert(topo.position[dependent]);
            }
        }
    }

    out
}
