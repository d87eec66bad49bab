//! Graph builder: walks the root set and records dependency edges.
//!
//! The identity map doubles as the visited set. A node is registered before
//! its relations are enumerated, so any path leading back to it links to the
//! existing node instead of walking it again.

use crate::{
    model::{entity::EntityModel, relation::RelationModel},
    obs::sink::{MetricsEvent, record},
    traits::{EntityHandle, EntityId, MetadataProvider},
};
use std::collections::{BTreeMap, BTreeSet};

/// Index of a node in discovery order.
pub(crate) type NodeId = usize;

///
/// GraphEdge
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct GraphEdge {
    pub(crate) node: NodeId,
    pub(crate) relation: &'static RelationModel,
}

///
/// EdgeSet
///
/// Insertion-ordered edge set keyed on (node, relation name).
///

#[derive(Debug, Default)]
pub(crate) struct EdgeSet {
    edges: Vec<GraphEdge>,
    keys: BTreeSet<(NodeId, &'static str)>,
}

impl EdgeSet {
    pub(crate) fn insert(&mut self, edge: GraphEdge) -> bool {
        if !self.keys.insert((edge.node, edge.relation.name)) {
            return false;
        }
        self.edges.push(edge);

        true
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    pub(crate) fn as_slice(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub(crate) const fn len(&self) -> usize {
        self.edges.len()
    }
}

///
/// GraphNode
///

#[derive(Debug)]
pub(crate) struct GraphNode<E> {
    pub(crate) entity: E,
    pub(crate) model: &'static EntityModel,
    /// Nodes that must be written before this one.
    pub(crate) depends_on: EdgeSet,
    /// Nodes that must be written after this one.
    pub(crate) dependents: EdgeSet,
}

///
/// DependencyGraph
///
/// Arena of visited entities in discovery order plus the identity index.
///

#[derive(Debug)]
pub(crate) struct DependencyGraph<E> {
    pub(crate) nodes: Vec<GraphNode<E>>,
    index: BTreeMap<EntityId, NodeId>,
    pub(crate) unknown_skipped: u64,
}

impl<E: EntityHandle> DependencyGraph<E> {
    const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: BTreeMap::new(),
            unknown_skipped: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of dependency edges (each mirrored pair counted once).
    pub(crate) fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.depends_on.len()).sum()
    }

    pub(crate) fn path_of(&self, node: NodeId) -> &'static str {
        self.nodes[node].model.path
    }

    fn link(&mut self, parent: NodeId, relation: &'static RelationModel, child: NodeId) {
        let mirrored = relation.inverse_or_self();

        if relation.owner_waits_on_target() {
            self.nodes[parent].depends_on.insert(GraphEdge {
                node: child,
                relation,
            });
            self.nodes[child].dependents.insert(GraphEdge {
                node: parent,
                relation: mirrored,
            });
        } else {
            self.nodes[parent].dependents.insert(GraphEdge {
                node: child,
                relation,
            });
            self.nodes[child].depends_on.insert(GraphEdge {
                node: parent,
                relation: mirrored,
            });
        }
    }
}

// One pending node whose relations are still being linked.
struct Frame<E> {
    node: NodeId,
    pending: std::vec::IntoIter<(&'static RelationModel, E)>,
}

///
/// GraphBuilder
///

struct GraphBuilder<'a, M: MetadataProvider> {
    metadata: &'a M,
    graph: DependencyGraph<M::Entity>,
}

impl<M: MetadataProvider> GraphBuilder<'_, M> {
    // Register `entity` if its type is recognized.
    // Returns the node and whether it was registered by this call.
    fn register(&mut self, entity: M::Entity) -> Option<(NodeId, bool)> {
        let Some(model) = self.metadata.resolve_type(&entity) else {
            self.graph.unknown_skipped = self.graph.unknown_skipped.saturating_add(1);
            record(MetricsEvent::UnknownTypeSkipped);
            return None;
        };

        let identity = entity.identity();
        if let Some(&node) = self.graph.index.get(&identity) {
            return Some((node, false));
        }

        let node = self.graph.nodes.len();
        self.graph.nodes.push(GraphNode {
            entity,
            model,
            depends_on: EdgeSet::default(),
            dependents: EdgeSet::default(),
        });
        self.graph.index.insert(identity, node);

        Some((node, true))
    }

    // Read every populated navigation of a node, in declared relation order.
    fn related(&self, node: NodeId) -> Vec<(&'static RelationModel, M::Entity)> {
        let GraphNode { entity, model, .. } = &self.graph.nodes[node];
        let mut related = Vec::new();

        for &relation in self.metadata.relations_of(*model) {
            if relation.is_collection() {
                if let Some(members) = self.metadata.collection_value(entity, relation) {
                    related.extend(members.into_iter().map(|member| (relation, member)));
                }
            } else if let Some(target) = self.metadata.reference_value(entity, relation) {
                related.push((relation, target));
            }
        }

        related
    }

    fn frame(&self, node: NodeId) -> Frame<M::Entity> {
        Frame {
            node,
            pending: self.related(node).into_iter(),
        }
    }

    // Depth-first walk from one root with an explicit frame stack.
    // Registration order matches a recursive pre-order walk.
    fn visit_root(&mut self, root: M::Entity) {
        let Some((root_node, true)) = self.register(root) else {
            return;
        };

        let mut stack = vec![self.frame(root_node)];
        while let Some(frame) = stack.last_mut() {
            let parent = frame.node;
            let Some((relation, child)) = frame.pending.next() else {
                stack.pop();
                continue;
            };

            let Some((child_node, fresh)) = self.register(child) else {
                continue;
            };
            self.graph.link(parent, relation, child_node);

            if fresh {
                stack.push(self.frame(child_node));
            }
        }
    }
}

/// Build the dependency graph reachable from `roots`.
pub(crate) fn build<M: MetadataProvider>(
    metadata: &M,
    roots: &[M::Entity],
) -> DependencyGraph<M::Entity> {
    let mut builder = GraphBuilder {
        metadata,
        graph: DependencyGraph::new(),
    };

    for root in roots {
        builder.visit_root(root.clone());
    }

    builder.graph
}
