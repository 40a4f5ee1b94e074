use std::collections::HashMap;

use augur_core::causal::{aggregate_predictions, find_causal_chains, ChainEstimate};
use augur_core::ingest::normalize;
use augur_core::{
    ChainConfig, Edge, Graph, GraphMetadata, Node, NodeType, PredictionConfig, RelationType,
};
use proptest::prelude::*;

const RELATIONS: [RelationType; 6] = [
    RelationType::Causes,
    RelationType::Influences,
    RelationType::Affects,
    RelationType::Predicts,
    RelationType::Mentions,
    RelationType::Precedes,
];

const LABELS: [&str; 6] = [
    "wage growth",
    "job loss",
    "market rise",
    "output decline",
    "policy shift",
    "credit boost",
];

fn build_graph(node_count: usize, raw_edges: &[(usize, usize, usize, f64)]) -> (Vec<Node>, Vec<Edge>) {
    let mut nodes = vec![Node::new("e1", "Will it happen?", NodeType::Event)];
    for i in 0..node_count {
        let node_type = if i % 4 == 3 {
            NodeType::Person
        } else {
            NodeType::Concept
        };
        nodes.push(Node::new(format!("n{i}"), LABELS[i % LABELS.len()], node_type));
    }

    let id = |i: usize| {
        if i == node_count {
            "e1".to_string()
        } else {
            format!("n{i}")
        }
    };

    let edges = raw_edges
        .iter()
        .map(|&(from, to, rel, strength)| {
            Edge::new(id(from), id(to), RELATIONS[rel % RELATIONS.len()], strength)
        })
        .collect();

    (nodes, edges)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "[A-Za-z0-9 _.,'-]{0,80}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(once.chars().count() <= 50);
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn chains_are_valid_on_random_graphs(
        node_count in 1usize..8,
        raw in prop::collection::vec((0usize..8, 0usize..8, 0usize..6, 0.1_f64..1.0_f64), 0..24),
    ) {
        let raw: Vec<_> = raw
            .into_iter()
            .map(|(a, b, r, s)| (a % (node_count + 1), b % (node_count + 1), r, s))
            .collect();
        let (nodes, edges) = build_graph(node_count, &raw);
        let config = ChainConfig::default();

        let chains = find_causal_chains(&nodes, &edges, "e1", &config);
        prop_assert!(chains.len() <= config.max_chains);

        let types: HashMap<&str, NodeType> =
            nodes.iter().map(|n| (n.id.as_str(), n.node_type)).collect();

        for pair in chains.windows(2) {
            prop_assert!(pair[0].strength >= pair[1].strength);
        }

        for chain in &chains {
            prop_assert!(chain.path.len() >= 2);
            prop_assert_eq!(chain.length, chain.path.len());
            prop_assert!(types[chain.path[0].as_str()].starts_chain());
            prop_assert_eq!(chain.path.last().map(String::as_str), Some("e1"));
            prop_assert!((0.0..=1.0).contains(&chain.strength));

            for step in chain.path.windows(2) {
                prop_assert!(edges
                    .iter()
                    .any(|e| e.connects(&step[0], &step[1]) && e.relationship.is_causal_link()));
            }
        }
    }

    #[test]
    fn predictions_stay_within_bounds(
        node_count in 1usize..8,
        raw in prop::collection::vec((0usize..8, 0usize..8, 0usize..6, 0.1_f64..1.0_f64), 0..24),
    ) {
        let raw: Vec<_> = raw
            .into_iter()
            .map(|(a, b, r, s)| (a % (node_count + 1), b % (node_count + 1), r, s))
            .collect();
        let (nodes, edges) = build_graph(node_count, &raw);
        let causal_chains = find_causal_chains(&nodes, &edges, "e1", &ChainConfig::default());
        let graph = Graph {
            nodes,
            edges,
            metadata: GraphMetadata {
                causal_chains,
                ..GraphMetadata::default()
            },
        };

        let config = PredictionConfig::default();
        let predictions = augur_core::causal::predict_from_causality(&graph, &config);

        prop_assert!(!predictions.is_empty());
        prop_assert!(predictions.len() <= config.max_predictions);
        for p in &predictions {
            prop_assert!((0.1..=0.9).contains(&p.probability));
            prop_assert!((p.ci_lower - (p.probability - 0.15).max(0.0)).abs() < 1e-12);
            prop_assert!((p.ci_upper - (p.probability + 0.15).min(1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn aggregation_is_a_bounded_weighted_mean(
        raw in prop::collection::vec((0usize..3, 0.1_f64..0.9_f64, 0.05_f64..1.0_f64), 1..12),
    ) {
        let outcomes = ["Yes", "No", "Maybe"];
        let estimates: Vec<ChainEstimate> = raw
            .iter()
            .map(|&(o, probability, confidence)| ChainEstimate {
                outcome: outcomes[o].to_string(),
                probability,
                confidence,
                reasoning: String::new(),
            })
            .collect();

        let config = PredictionConfig::default();
        let predictions = aggregate_predictions(&estimates, &config);
        prop_assert!(predictions.len() <= config.max_predictions);

        for pair in predictions.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
        }

        for p in &predictions {
            let group: Vec<&ChainEstimate> =
                estimates.iter().filter(|e| e.outcome == p.outcome).collect();
            let min = group.iter().map(|e| e.probability).fold(f64::INFINITY, f64::min);
            let max = group.iter().map(|e| e.probability).fold(f64::NEG_INFINITY, f64::max);

            prop_assert!(p.probability >= min - 1e-9 && p.probability <= max + 1e-9);
            prop_assert!((p.ci_lower - (p.probability - 0.15).max(0.0)).abs() < 1e-12);
            prop_assert!((p.ci_upper - (p.probability + 0.15).min(1.0)).abs() < 1e-12);
        }
    }
}
