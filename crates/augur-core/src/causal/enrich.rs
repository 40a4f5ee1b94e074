use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use tracing::debug;

use super::view::CausalView;
use crate::config::ChainConfig;
use crate::graph::{Edge, EdgeProperties, Node};
use crate::relationship::RelationType;

/// Synthesizes `A -> C` INFLUENCES edges from `A -> B -> C` chains of CAUSES or
/// INFLUENCES edges.
///
/// Every ordered triple of distinct nodes is considered, in node order, so the cost is
/// cubic in the node count. Per-source caps keep the graphs small enough for that. Only
/// edges present on entry are used as links; the first qualifying edge per pair decides
/// the strength, which is the mean of both links times `config.transitive_decay`.
#[must_use]
pub fn find_transitive_relationships(
    nodes: &[Node],
    edges: &[Edge],
    config: &ChainConfig,
) -> Vec<Edge> {
    let positions: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut links: HashMap<(usize, usize), &Edge> = HashMap::new();
    for edge in edges.iter().filter(|e| e.relationship.is_transitive_link()) {
        let (Some(&from), Some(&to)) = (
            positions.get(edge.source.as_str()),
            positions.get(edge.target.as_str()),
        ) else {
            continue;
        };
        links.entry((from, to)).or_insert(edge);
    }

    let mut transitive = Vec::new();
    let count = nodes.len();

    for source in 0..count {
        for middle in 0..count {
            if middle == source {
                continue;
            }
            let Some(first) = links.get(&(source, middle)) else {
                continue;
            };

            for target in 0..count {
                if target == middle || target == source {
                    continue;
                }
                let Some(second) = links.get(&(middle, target)) else {
                    continue;
                };

                let strength = (first.strength + second.strength) / 2.0 * config.transitive_decay;
                let path = vec![
                    nodes[source].id.clone(),
                    nodes[middle].id.clone(),
                    nodes[target].id.clone(),
                ];

                transitive.push(
                    Edge::new(
                        nodes[source].id.clone(),
                        nodes[target].id.clone(),
                        RelationType::Influences,
                        strength,
                    )
                    .with_properties(EdgeProperties {
                        transitive: true,
                        path,
                        ..EdgeProperties::default()
                    }),
                );
            }
        }
    }

    transitive
}

/// Appends transitive edges that do not duplicate an existing INFLUENCES edge between
/// the same pair, then runs motif detection. Returns the number of edges added.
pub fn enrich_graph(nodes: &[Node], edges: &mut Vec<Edge>, config: &ChainConfig) -> usize {
    let candidates = find_transitive_relationships(nodes, edges, config);

    let mut influences: HashSet<(String, String)> = edges
        .iter()
        .filter(|e| e.relationship == RelationType::Influences)
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();

    let mut added = 0;
    for edge in candidates {
        if influences.insert((edge.source.clone(), edge.target.clone())) {
            edges.push(edge);
            added += 1;
        }
    }

    if added > 0 {
        debug!("Added {} transitive edges", added);
    }

    let motifs = detect_motifs(nodes, edges);
    if !motifs.is_empty() {
        debug!(
            "Found {} causal triangles and {} feedback loops",
            motifs.triangles.len(),
            motifs.feedback_loops.len()
        );
    }

    added
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Motifs {
    /// `[a, b, c]` with causal edges `a -> b`, `b -> c` and `a -> c`
    pub triangles: Vec<[String; 3]>,
    /// Node sets that can all reach each other over causal edges
    pub feedback_loops: Vec<Vec<String>>,
}

impl Motifs {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.feedback_loops.is_empty()
    }
}

/// Read-only scan for causal triangles and feedback loops. Never changes the graph.
#[must_use]
pub fn detect_motifs(nodes: &[Node], edges: &[Edge]) -> Motifs {
    let view = CausalView::new(nodes, edges);
    let graph = view.graph();

    let mut triangles = Vec::new();
    for a in graph.node_indices() {
        for b in view.successors(a) {
            for c in view.successors(b) {
                if c != a && graph.contains_edge(a, c) {
                    triangles.push([
                        view.id(a).to_string(),
                        view.id(b).to_string(),
                        view.id(c).to_string(),
                    ]);
                }
            }
        }
    }

    let feedback_loops = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut ids: Vec<String> = scc.into_iter().map(|n| view.id(n).to_string()).collect();
            ids.sort();
            ids
        })
        .collect();

    Motifs {
        triangles,
        feedback_loops,
    }
}
