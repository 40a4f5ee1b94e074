use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PredictionConfig;
use crate::graph::{Chain, Graph, Node, NodeType};

pub const DEFAULT_OUTCOME: &str = "Yes";
pub const FALLBACK_REASONING: &str = "Insufficient causal data for prediction";
pub const DEFAULT_REASONING: &str = "Based on causal analysis";

const POSITIVE_SIGNALS: &[&str] = &[
    "increase", "rise", "growth", "success", "positive", "gain", "improve", "boost",
];
const NEGATIVE_SIGNALS: &[&str] = &[
    "decrease", "fall", "decline", "failure", "negative", "loss", "worsen", "drop",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Strictly above `high_confidence` is High, strictly above `medium_confidence`
    /// is Medium, anything else Low.
    #[must_use]
    pub fn from_score(score: f64, config: &PredictionConfig) -> Self {
        if score > config.high_confidence {
            Self::High
        } else if score > config.medium_confidence {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked outcome estimate.
///
/// The interval is a fixed band of `interval_half_width` around the probability, not a
/// statistical confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub outcome: String,
    pub probability: f64,
    pub confidence: ConfidenceLevel,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub reasoning: String,
}

impl Prediction {
    /// The Low-confidence coin flip returned when the graph carries no usable chains.
    #[must_use]
    pub fn fallback(config: &PredictionConfig) -> Self {
        Self::banded(
            DEFAULT_OUTCOME.to_string(),
            config.base_probability,
            ConfidenceLevel::Low,
            FALLBACK_REASONING.to_string(),
            config,
        )
    }

    fn banded(
        outcome: String,
        probability: f64,
        confidence: ConfidenceLevel,
        reasoning: String,
        config: &PredictionConfig,
    ) -> Self {
        Self {
            outcome,
            probability,
            confidence,
            ci_lower: (probability - config.interval_half_width).max(0.0),
            ci_upper: (probability + config.interval_half_width).min(1.0),
            reasoning,
        }
    }
}

/// Per-chain estimate before aggregation. `confidence` is the chain strength.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEstimate {
    pub outcome: String,
    pub probability: f64,
    pub confidence: f64,
    pub reasoning: String,
}

fn mentions_any(node: &Node, words: &[&str]) -> bool {
    let label = node.label.to_lowercase();
    words.iter().any(|w| label.contains(w))
}

#[must_use]
pub fn is_positive_signal(node: &Node) -> bool {
    mentions_any(node, POSITIVE_SIGNALS)
}

#[must_use]
pub fn is_negative_signal(node: &Node) -> bool {
    mentions_any(node, NEGATIVE_SIGNALS)
}

/// Label of the chain's final node when it is an Outcome, else the target of the first
/// edge from any path node into an Outcome node, else `"Yes"`.
#[must_use]
pub fn infer_outcome(path_nodes: &[&Node], graph: &Graph, lookup: &HashMap<&str, &Node>) -> String {
    if let Some(last) = path_nodes.last() {
        if last.node_type == NodeType::Outcome && !last.label.is_empty() {
            return last.label.clone();
        }
    }

    graph
        .edges
        .iter()
        .filter(|e| path_nodes.iter().any(|n| n.id == e.source))
        .find_map(|e| {
            lookup
                .get(e.target.as_str())
                .filter(|n| n.node_type == NodeType::Outcome)
        })
        .filter(|n| !n.label.is_empty())
        .map_or_else(|| DEFAULT_OUTCOME.to_string(), |n| n.label.clone())
}

/// `Causal chain: Factor: A [Sources: t1, t2] -> B -> Outcome: C. Strength: 61.2%.`
#[must_use]
pub fn generate_reasoning(chain: &Chain, path_nodes: &[&Node], config: &PredictionConfig) -> String {
    let last = path_nodes.len().saturating_sub(1);

    let steps: Vec<String> = path_nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.label.is_empty())
        .map(|(idx, node)| {
            let titles: Vec<&str> = node
                .properties
                .sources
                .iter()
                .take(config.max_cited_sources)
                .map(|s| s.source_title.as_str())
                .collect();
            let refs = if titles.is_empty() {
                String::new()
            } else {
                format!(" [Sources: {}]", titles.join(", "))
            };

            if idx == 0 {
                format!("Factor: {}{refs}", node.label)
            } else if idx == last {
                format!("Outcome: {}{refs}", node.label)
            } else {
                format!("{}{refs}", node.label)
            }
        })
        .collect();

    format!(
        "Causal chain: {}. Strength: {:.1}%.",
        steps.join(" -> "),
        chain.strength * 100.0
    )
}

/// Scores one chain: net positive/negative signal over the path, scaled by the chain
/// strength around the base probability. `None` when no path node resolves.
#[must_use]
pub fn estimate_chain(
    chain: &Chain,
    graph: &Graph,
    lookup: &HashMap<&str, &Node>,
    config: &PredictionConfig,
) -> Option<ChainEstimate> {
    let path_nodes: Vec<&Node> = chain
        .path
        .iter()
        .filter_map(|id| {
            let node = lookup.get(id.as_str()).copied();
            if node.is_none() {
                warn!("Chain references unknown node {}", id);
            }
            node
        })
        .collect();

    if path_nodes.is_empty() {
        return None;
    }

    let positive = path_nodes.iter().filter(|n| is_positive_signal(n)).count();
    let negative = path_nodes.iter().filter(|n| is_negative_signal(n)).count();
    let signal_diff = (positive as f64 - negative as f64) / path_nodes.len() as f64;

    let probability = (config.base_probability + signal_diff * chain.strength)
        .clamp(config.min_probability, config.max_probability);

    Some(ChainEstimate {
        outcome: infer_outcome(&path_nodes, graph, lookup),
        probability,
        confidence: chain.strength,
        reasoning: generate_reasoning(chain, &path_nodes, config),
    })
}

/// Groups estimates by outcome in first-seen order, takes the confidence-weighted mean
/// probability of each group and keeps the most probable groups.
#[must_use]
pub fn aggregate_predictions(estimates: &[ChainEstimate], config: &PredictionConfig) -> Vec<Prediction> {
    let mut groups: Vec<(&str, Vec<&ChainEstimate>)> = Vec::new();

    for estimate in estimates.iter().filter(|e| !e.outcome.is_empty()) {
        match groups.iter_mut().find(|(outcome, _)| *outcome == estimate.outcome) {
            Some((_, members)) => members.push(estimate),
            None => groups.push((estimate.outcome.as_str(), vec![estimate])),
        }
    }

    let mut predictions: Vec<Prediction> = groups
        .into_iter()
        .filter_map(|(outcome, members)| {
            let total_weight: f64 = members.iter().map(|e| e.confidence).sum();
            if total_weight <= 0.0 {
                return None;
            }

            let weighted: f64 = members.iter().map(|e| e.probability * e.confidence).sum();
            let probability =
                (weighted / total_weight).clamp(config.min_probability, config.max_probability);
            let avg_confidence = total_weight / members.len() as f64;

            let reasoning = members
                .iter()
                .map(|e| e.reasoning.as_str())
                .filter(|r| !r.is_empty())
                .collect::<Vec<_>>()
                .join("; ");
            let reasoning = if reasoning.is_empty() {
                DEFAULT_REASONING.to_string()
            } else {
                reasoning
            };

            Some(Prediction::banded(
                outcome.to_string(),
                probability,
                ConfidenceLevel::from_score(avg_confidence, config),
                reasoning,
                config,
            ))
        })
        .collect();

    predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    predictions.truncate(config.max_predictions);
    predictions
}

/// Turns the graph's causal chains into at most `max_predictions` ranked predictions,
/// or the single fallback prediction when there is nothing to go on.
#[must_use]
pub fn predict_from_causality(graph: &Graph, config: &PredictionConfig) -> Vec<Prediction> {
    let chains = &graph.metadata.causal_chains;

    if graph.nodes.is_empty() || chains.is_empty() {
        warn!("No causal chains available, using fallback prediction");
        return vec![Prediction::fallback(config)];
    }

    let lookup = graph.node_lookup();
    let estimates: Vec<ChainEstimate> = chains
        .iter()
        .filter_map(|chain| estimate_chain(chain, graph, &lookup, config))
        .collect();
    debug!("Estimated {} of {} chains", estimates.len(), chains.len());

    let predictions = aggregate_predictions(&estimates, config);
    if predictions.is_empty() {
        warn!("No chain produced an outcome, using fallback prediction");
        return vec![Prediction::fallback(config)];
    }

    predictions
}
