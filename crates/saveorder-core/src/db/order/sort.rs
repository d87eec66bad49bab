//! Topological sorter: depth-first post-order over `depends_on` edges.

use crate::{
    db::{
        config::CyclePolicy,
        order::{
            ResolveError,
            graph::{DependencyGraph, NodeId},
        },
    },
    obs::sink::{MetricsEvent, record},
    traits::EntityHandle,
};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

///
/// TopologicalOrder
///
/// Linear order where every honored dependency precedes its dependent.
/// `position[node]` is the index of `node` in `order`.
/// `broken` holds the (dependent, dependency) pairs dropped to break a cycle.
///

#[derive(Debug)]
pub(crate) struct TopologicalOrder {
    pub(crate) order: Vec<NodeId>,
    pub(crate) position: Vec<usize>,
    pub(crate) broken: BTreeSet<(NodeId, NodeId)>,
}

impl TopologicalOrder {
    /// Number of distinct dependency pairs dropped to break cycles.
    pub(crate) fn cycles_broken(&self) -> u64 {
        self.broken.len() as u64
    }

    /// True when the edge `dependent -> dependency` is satisfied by this order.
    /// Self-edges and edges dropped to break a cycle are not.
    pub(crate) fn honors(&self, dependent: NodeId, dependency: NodeId) -> bool {
        self.position[dependency] < self.position[dependent]
    }
}

/// Sort the graph, visiting roots in discovery order.
pub(crate) fn sort<E: EntityHandle>(
    graph: &DependencyGraph<E>,
    policy: CyclePolicy,
) -> Result<TopologicalOrder, ResolveError> {
    let len = graph.len();
    let mut marks = vec![Mark::Unvisited; len];
    let mut order = Vec::with_capacity(len);
    let mut broken = BTreeSet::new();

    for start in 0..len {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        marks[start] = Mark::InProgress;
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];

        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let Some(edge) = graph.nodes[node].depends_on.as_slice().get(*next) else {
                marks[node] = Mark::Done;
                order.push(node);
                stack.pop();
                continue;
            };
            *next += 1;

            let target = edge.node;
            match marks[target] {
                Mark::Unvisited => {
                    marks[target] = Mark::InProgress;
                    stack.push((target, 0));
                }
                Mark::InProgress if target != node => match policy {
                    // Several relations may close the same pair; it is dropped once.
                    CyclePolicy::Break => {
                        if broken.insert((node, target)) {
                            record(MetricsEvent::CycleBroken {
                                entity_path: graph.path_of(node),
                            });
                        }
                    }
                    CyclePolicy::Reject => {
                        return Err(ResolveError::CyclicDependency {
                            entity_path: graph.path_of(node),
                            relation: edge.relation.name,
                            target_path: graph.path_of(target),
                        });
                    }
                },
                Mark::InProgress | Mark::Done => {}
            }
        }
    }

    let mut position = vec![0; len];
    for (index, &node) in order.iter().enumerate() {
        position[node] = index;
    }

    Ok(TopologicalOrder {
        order,
        position,
        broken,
    })
}
