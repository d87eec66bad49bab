use crate::{
    db::order::{
        depth::Grouping,
        graph::{DependencyGraph, GraphEdge, NodeId},
        sort::TopologicalOrder,
    },
    error::InternalError,
    model::{entity::EntityModel, relation::RelationModel},
    traits::{EntityHandle, EntityId},
};
use derive_more::{Deref, IntoIterator};
use std::collections::{BTreeMap, BTreeSet};

///
/// DependencyEdge
///

#[derive(Clone, Debug)]
pub struct DependencyEdge<E> {
    pub entity: E,
    pub relation: &'static RelationModel,
}

///
/// DependencyRecord
///
/// Edges of one resolved entity. `depends_on` must be written first,
/// `dependents` after; consumers use them for post-write key fix-up.
///

#[derive(Clone, Debug)]
pub struct DependencyRecord<E> {
    pub depends_on: Vec<DependencyEdge<E>>,
    pub dependents: Vec<DependencyEdge<E>>,
}

impl<E> DependencyRecord<E> {
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        self.depends_on.is_empty() && self.dependents.is_empty()
    }
}

///
/// ResolvedNode
///

#[derive(Clone, Debug)]
pub struct ResolvedNode<E> {
    pub entity: E,
    pub model: &'static EntityModel,
    pub record: DependencyRecord<E>,
}

///
/// TypeBatch
///
/// One contiguous run of same-type nodes; a bulk writer issues one
/// statement per batch.
///

#[derive(Debug)]
pub struct TypeBatch<'a, E> {
    pub model: &'static EntityModel,
    pub nodes: &'a [ResolvedNode<E>],
}

impl<E> TypeBatch<'_, E> {
    #[must_use]
    pub const fn entity_path(&self) -> &'static str {
        self.model.path
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

///
/// ResolveStats
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolveStats {
    pub nodes: usize,
    pub edges: usize,
    /// Distinct (dependent, dependency) pairs dropped to break a cycle.
    pub cycles_broken: u64,
    pub unknown_skipped: u64,
    pub batches: usize,
    pub grouping: Grouping,
}

///
/// WritePlan
///
/// Final write order: every entity appears once, dependencies first.
/// Dereferences to the ordered node list.
///

#[derive(Debug, Deref, IntoIterator)]
pub struct WritePlan<E> {
    #[deref]
    #[into_iterator(owned, ref)]
    nodes: Vec<ResolvedNode<E>>,
    positions: BTreeMap<EntityId, usize>,
    // (dependent, dependency) pairs dropped to break a cycle.
    broken: BTreeSet<(EntityId, EntityId)>,
    stats: ResolveStats,
}

impl<E: EntityHandle> WritePlan<E> {
    pub(crate) fn from_graph(
        graph: DependencyGraph<E>,
        topo: &TopologicalOrder,
        order: &[NodeId],
        grouping: Grouping,
    ) -> Self {
        let edges = graph.edge_count();
        let unknown_skipped = graph.unknown_skipped;

        let identities: Vec<EntityId> = graph
            .nodes
            .iter()
            .map(|node| node.entity.identity())
            .collect();

        let broken = topo
            .broken
            .iter()
            .map(|&(dependent, dependency)| (identities[dependent], identities[dependency]))
            .collect();

        // Resolve node-index edges to entity handles before reordering.
        let entities: Vec<E> = graph
            .nodes
            .iter()
            .map(|node| node.entity.clone())
            .collect();
        let to_edges = |set: &[GraphEdge]| -> Vec<DependencyEdge<E>> {
            set.iter()
                .map(|edge| DependencyEdge {
                    entity: entities[edge.node].clone(),
                    relation: edge.relation,
                })
                .collect()
        };

        let mut slots: Vec<Option<ResolvedNode<E>>> = graph
            .nodes
            .iter()
            .map(|node| {
                Some(ResolvedNode {
                    entity: node.entity.clone(),
                    model: node.model,
                    record: DependencyRecord {
                        depends_on: to_edges(node.depends_on.as_slice()),
                        dependents: to_edges(node.dependents.as_slice()),
                    },
                })
            })
            .collect();

        let nodes: Vec<ResolvedNode<E>> = order
            .iter()
            .filter_map(|&node| slots[node].take())
            .collect();
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.entity.identity(), index))
            .collect();

        let batches = nodes
            .chunk_by(|a, b| a.model.path == b.model.path)
            .count();

        Self {
            nodes,
            positions,
            broken,
            stats: ResolveStats {
                nodes: graph.len(),
                edges,
                cycles_broken: topo.cycles_broken(),
                unknown_skipped,
                batches,
                grouping,
            },
        }
    }

    #[must_use]
    pub const fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Index of `entity` in the write order, if it was resolved.
    #[must_use]
    pub fn position_of(&self, entity: &E) -> Option<usize> {
        self.positions.get(&entity.identity()).copied()
    }

    /// Contiguous same-type runs in write order.
    pub fn batches(&self) -> impl Iterator<Item = TypeBatch<'_, E>> {
        self.nodes
            .chunk_by(|a, b| a.model.path == b.model.path)
            .filter_map(|nodes| {
                nodes.first().map(|first| TypeBatch {
                    model: first.model,
                    nodes,
                })
            })
    }

    /// Nodes in delete order: every dependent before what it depends on.
    pub fn delete_order(&self) -> impl Iterator<Item = &ResolvedNode<E>> {
        self.nodes.iter().rev()
    }

    /// True when the dependency edge was dropped to break a cycle.
    #[must_use]
    pub fn is_cycle_broken(&self, dependent: &E, dependency: &E) -> bool {
        self.broken
            .contains(&(dependent.identity(), dependency.identity()))
    }

    /// Re-check that every dependency precedes its dependent.
    ///
    /// Self-references and edges dropped to break a cycle are exempt.
    pub fn verify(&self) -> Result<(), InternalError> {
        for (index, node) in self.nodes.iter().enumerate() {
            let dependent = node.entity.identity();

            for edge in &node.record.depends_on {
                let dependency = edge.entity.identity();
                if dependency == dependent || self.broken.contains(&(dependent, dependency)) {
                    continue;
                }

                let Some(&dependency_index) = self.positions.get(&dependency) else {
                    return Err(InternalError::plan_invariant(format!(
                        "write plan missing dependency: entity={} ({dependent}) relation={} dependency={dependency}",
                        node.model.path, edge.relation.name,
                    )));
                };

                if dependency_index >= index {
                    return Err(InternalError::plan_invariant(format!(
                        "write plan out of order: entity={} ({dependent}) at {index} depends on {dependency} at {dependency_index} via relation={}",
                        node.model.path, edge.relation.name,
                    )));
                }
            }
        }

        Ok(())
    }
}
