use petgraph::graph::NodeIndex;
use petgraph::visit::{VisitMap, Visitable};

use super::view::CausalView;
use crate::config::ChainConfig;
use crate::graph::{Chain, Edge, Node};

/// Finds, for every Concept or Factor node, the first causal path to the event.
///
/// Paths follow CAUSES, INFLUENCES, AFFECTS and PREDICTS edges in insertion order.
/// Cycle avoidance is per path: each branch carries its own copy of the visited set,
/// so a node may appear on several candidate paths. Results are sorted by strength,
/// strongest first, and capped at `config.max_chains`.
#[must_use]
pub fn find_causal_chains(
    nodes: &[Node],
    edges: &[Edge],
    event_id: &str,
    config: &ChainConfig,
) -> Vec<Chain> {
    let view = CausalView::new(nodes, edges);
    let Some(event) = view.index(event_id) else {
        return Vec::new();
    };

    let mut chains = Vec::new();

    for node in nodes.iter().filter(|n| n.node_type.starts_chain()) {
        let Some(start) = view.index(&node.id) else {
            continue;
        };

        let Some(path) = path_to_event(&view, start, event, view.graph().visit_map()) else {
            continue;
        };
        if path.len() < 2 {
            continue;
        }

        let path: Vec<String> = path.into_iter().map(|n| view.id(n).to_string()).collect();
        let strength = path_strength(&path, edges, config);

        chains.push(Chain {
            start: node.id.clone(),
            end: event_id.to_string(),
            length: path.len(),
            path,
            strength,
        });
    }

    chains.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    chains.truncate(config.max_chains);
    chains
}

fn path_to_event<M>(
    view: &CausalView<'_>,
    current: NodeIndex,
    event: NodeIndex,
    mut visited: M,
) -> Option<Vec<NodeIndex>>
where
    M: VisitMap<NodeIndex> + Clone,
{
    if current == event {
        return Some(vec![current]);
    }
    if !visited.visit(current) {
        return None;
    }

    view.successors(current).find_map(|next| {
        let mut rest = path_to_event(view, next, event, visited.clone())?;
        rest.insert(0, current);
        Some(rest)
    })
}

/// Stands in for an edge whose strength is zero.
const UNWEIGHTED_EDGE_STRENGTH: f64 = 0.5;

/// Product over consecutive pairs of the strength of the first edge of any type from
/// one to the next, with `missing_edge_penalty` for pairs that share none, decayed by
/// `length_decay` for every hop beyond the first.
#[must_use]
pub fn path_strength(path: &[String], edges: &[Edge], config: &ChainConfig) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }

    let product: f64 = path
        .windows(2)
        .map(|pair| {
            edges
                .iter()
                .find(|e| e.connects(&pair[0], &pair[1]))
                .map_or(config.missing_edge_penalty, |e| {
                    if e.strength > 0.0 {
                        e.strength
                    } else {
                        UNWEIGHTED_EDGE_STRENGTH
                    }
                })
        })
        .product();

    let extra_hops = i32::try_from(path.len() - 2).unwrap_or(i32::MAX);
    product * config.length_decay.powi(extra_hops)
}
