mod builder;
mod chains;
mod enrich;
mod predict;
mod view;

pub use builder::{Analysis, CausalityEngine, UNTITLED_EVENT};
pub use chains::{find_causal_chains, path_strength};
pub use enrich::{detect_motifs, enrich_graph, find_transitive_relationships, Motifs};
pub use predict::{
    aggregate_predictions, estimate_chain, generate_reasoning, infer_outcome,
    is_negative_signal, is_positive_signal, predict_from_causality, ChainEstimate,
    ConfidenceLevel, Prediction, DEFAULT_OUTCOME, DEFAULT_REASONING, FALLBACK_REASONING,
};
pub use view::CausalView;
