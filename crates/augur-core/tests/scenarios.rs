use augur_core::causal::predict_from_causality;
use augur_core::{
    CausalityEngine, ConfidenceLevel, EngineConfig, EventDescriptor, NodeType, Prediction,
    RelationType, SourceRecord,
};

fn event() -> EventDescriptor {
    EventDescriptor::new("Will the economy slow down?").with_id("e1")
}

fn market_sources() -> Vec<SourceRecord> {
    vec![
        SourceRecord::new(
            "Rates outlook",
            "https://example.com/rates",
            "Rising interest rates causes economic slowdown. Consumer spending decreased by 2%.",
        )
        .with_relevance(0.9)
        .with_provider("Exa AI"),
        SourceRecord::new(
            "Fed watch",
            "https://example.com/fed",
            "Analysts expect the Federal Reserve will hold rates steady. \
             Following the announcement, bond yields fell.",
        )
        .with_recent(true),
    ]
}

#[test]
fn causal_sentence_becomes_causes_edge() {
    let source = SourceRecord::new(
        "Rates outlook",
        "https://example.com/rates",
        "Rising interest rates causes economic slowdown.",
    );
    let graph = CausalityEngine::default()
        .build_causal_graph(&[source], &event())
        .unwrap();

    let edge = graph
        .edges
        .iter()
        .find(|e| e.relationship == RelationType::Causes)
        .unwrap();
    assert!((edge.strength - 0.85).abs() < 1e-9);

    let from = graph.node(&edge.source).unwrap();
    let to = graph.node(&edge.target).unwrap();
    assert_eq!(from.label, "Rising interest rates");
    assert_eq!(to.label, "economic slowdown");
    assert_eq!(from.node_type, NodeType::Concept);
    assert_eq!(to.node_type, NodeType::Concept);

    let typed: Vec<NodeType> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type.is_entity())
        .map(|n| n.node_type)
        .collect();
    assert!(typed.iter().all(|t| *t == NodeType::Concept));
}

#[test]
fn zero_sources_yield_event_only() {
    let graph = CausalityEngine::default()
        .build_causal_graph(&[], &event())
        .unwrap();

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "e1");
    assert!(graph.edges.is_empty());
    assert!(graph.metadata.causal_chains.is_empty());
    assert_eq!(graph.metadata.total_sources, 0);
    assert_eq!(graph.metadata.entity_count, 0);
}

#[test]
fn federal_reserve_resolves_to_one_node() {
    let sources = vec![
        SourceRecord::new(
            "Statement",
            "https://example.com/a",
            "Federal Reserve said inflation remains elevated.",
        ),
        SourceRecord::new(
            "Preview",
            "https://example.com/b",
            "Analysts expect the Federal Reserve will hold rates steady.",
        ),
    ];
    let graph = CausalityEngine::default()
        .build_causal_graph(&sources, &event())
        .unwrap();

    let matching: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.label.contains("Federal Reserve"))
        .collect();
    assert_eq!(matching.len(), 1);

    let node = matching[0];
    assert_eq!(node.id, "entity_federal_reserve");
    assert_eq!(node.properties.sources.len(), 2);
    assert!((node.properties.confidence - 0.8).abs() < 1e-9);
    assert!((node.properties.importance - 0.7).abs() < 1e-9);
    assert!(graph.has_edge("source_0", &node.id, RelationType::Contains));
    assert!(graph.has_edge("source_1", &node.id, RelationType::Contains));
}

#[test]
fn builds_are_deterministic() {
    let engine = CausalityEngine::default();
    let sources = market_sources();

    let first = engine.build_causal_graph(&sources, &event()).unwrap();
    let second = engine.build_causal_graph(&sources, &event()).unwrap();
    assert_eq!(first, second);

    let other = engine
        .build_causal_graph(&sources[..1], &EventDescriptor::new("Other").with_id("e2"))
        .unwrap();
    assert!(other.node("e1").is_none());
    assert_eq!(
        engine.build_causal_graph(&sources, &event()).unwrap(),
        first
    );
}

#[test]
fn edges_reference_existing_nodes() {
    let graph = CausalityEngine::default()
        .build_causal_graph(&market_sources(), &event())
        .unwrap();

    assert!(!graph.edges.is_empty());
    for edge in &graph.edges {
        assert!(graph.contains_node(&edge.source), "dangling source {}", edge.source);
        assert!(graph.contains_node(&edge.target), "dangling target {}", edge.target);
        assert!((edge.weight - edge.strength).abs() < f64::EPSILON);
        assert!((0.0..=1.0).contains(&edge.strength));
    }

    assert_eq!(graph.metadata.total_relations, graph.edges.len());
    assert_eq!(graph.metadata.entity_count, graph.entity_count());
}

#[test]
fn quantitative_change_lands_on_statistic() {
    let graph = CausalityEngine::default()
        .build_causal_graph(&market_sources(), &event())
        .unwrap();

    let stat = graph.node("entity_decrease_of_2").unwrap();
    assert_eq!(stat.node_type, NodeType::Statistic);

    let edge = graph
        .edges
        .iter()
        .find(|e| e.target == stat.id && e.relationship == RelationType::Affects)
        .unwrap();
    assert_eq!(edge.properties.change, Some(-2.0));
}

#[test]
fn chains_end_at_event_over_causal_links() {
    let mut config = EngineConfig::default();
    config.quality.key_entity_min_importance = 0.6;
    config.quality.key_entity_min_confidence = 0.6;

    let source = SourceRecord::new(
        "Housing",
        "https://example.com/housing",
        "Investors watch the Housing Finance market closely. \
         Rising mortgage costs causes Housing Finance.",
    );
    let engine = CausalityEngine::new(config);
    let graph = engine.build_causal_graph(&[source], &event()).unwrap();

    assert!(!graph.metadata.causal_chains.is_empty());
    for chain in &graph.metadata.causal_chains {
        let start = graph.node(&chain.path[0]).unwrap();
        assert!(start.node_type.starts_chain());
        assert_eq!(chain.path.last().map(String::as_str), Some("e1"));
        assert_eq!(chain.length, chain.path.len());

        for pair in chain.path.windows(2) {
            assert!(graph
                .edges
                .iter()
                .any(|e| e.connects(&pair[0], &pair[1]) && e.relationship.is_causal_link()));
        }
    }

    let predictions = engine.predict_from_causality(&event(), &graph);
    assert!(!predictions.is_empty());
    for prediction in &predictions {
        assert!((0.1..=0.9).contains(&prediction.probability));
        assert!(prediction.reasoning.starts_with("Causal chain: Factor: "));
    }
}

#[test]
fn two_step_chain_gets_transitive_influence() {
    let source = SourceRecord::new(
        "Housing",
        "https://example.com/housing",
        "Rising mortgage costs causes lending slowdown. Lending slowdown causes housing weakness.",
    );
    let graph = CausalityEngine::default()
        .build_causal_graph(&[source], &event())
        .unwrap();

    let edge = graph
        .edges
        .iter()
        .find(|e| {
            e.properties.transitive
                && e.source == "entity_rising_mortgage_costs"
                && e.target == "entity_housing_weakness"
        })
        .unwrap();
    assert_eq!(edge.relationship, RelationType::Influences);
    assert!((edge.strength - (0.85 + 0.85) / 2.0 * 0.8).abs() < 1e-9);
    assert_eq!(
        edge.properties.path,
        vec![
            "entity_rising_mortgage_costs",
            "entity_lending_slowdown",
            "entity_housing_weakness",
        ]
    );
}

#[test]
fn empty_graph_predicts_fallback() {
    let engine = CausalityEngine::default();
    let graph = engine.build_causal_graph(&[], &event()).unwrap();

    let predictions = predict_from_causality(&graph, &engine.config().prediction);
    assert_eq!(predictions.len(), 1);

    let fallback = &predictions[0];
    assert_eq!(fallback.outcome, "Yes");
    assert!((fallback.probability - 0.5).abs() < f64::EPSILON);
    assert_eq!(fallback.confidence, ConfidenceLevel::Low);
    assert!((fallback.ci_lower - 0.35).abs() < 1e-9);
    assert!((fallback.ci_upper - 0.65).abs() < 1e-9);
    assert_eq!(fallback.reasoning, "Insufficient causal data for prediction");
    assert_eq!(
        predictions,
        vec![Prediction::fallback(&engine.config().prediction)]
    );
}

#[test]
fn graph_serializes_with_camel_case_keys() {
    let graph = CausalityEngine::default()
        .build_causal_graph(&market_sources(), &event())
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
    assert!(json["metadata"]["causalChains"].is_array());
    assert!(json["metadata"]["relationshipTypes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "INFORMS"));
    assert_eq!(json["nodes"][0]["type"], "Event");
}
