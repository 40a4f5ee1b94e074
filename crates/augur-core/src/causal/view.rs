use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::{Edge, Node};

/// Petgraph projection of a graph restricted to causal-link edges
/// (CAUSES, INFLUENCES, AFFECTS, PREDICTS).
///
/// Node indices follow the order of `nodes`. Edges whose endpoints are missing from
/// `nodes` are dropped.
pub struct CausalView<'a> {
    graph: DiGraph<&'a str, f64>,
    indices: HashMap<&'a str, NodeIndex>,
    /// Distinct successors per node, in order of their first causal edge
    successors: Vec<Vec<NodeIndex>>,
}

impl<'a> CausalView<'a> {
    #[must_use]
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut indices = HashMap::with_capacity(nodes.len());

        for node in nodes {
            indices
                .entry(node.id.as_str())
                .or_insert_with(|| graph.add_node(node.id.as_str()));
        }

        let mut successors = vec![Vec::new(); graph.node_count()];

        for edge in edges.iter().filter(|e| e.relationship.is_causal_link()) {
            let (Some(&from), Some(&to)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) else {
                tracing::warn!(
                    "Ignoring causal edge with unknown endpoint: {} -> {}",
                    edge.source,
                    edge.target
                );
                continue;
            };

            graph.add_edge(from, to, edge.strength);
            let next: &mut Vec<NodeIndex> = &mut successors[from.index()];
            if !next.contains(&to) {
                next.push(to);
            }
        }

        Self {
            graph,
            indices,
            successors,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &DiGraph<&'a str, f64> {
        &self.graph
    }

    #[must_use]
    pub fn index(&self, id: &str) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    #[must_use]
    pub fn id(&self, index: NodeIndex) -> &'a str {
        self.graph[index]
    }

    pub fn successors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.successors
            .get(index.index())
            .into_iter()
            .flatten()
            .copied()
    }
}
