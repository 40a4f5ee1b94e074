use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text handling limits applied before and during extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Source text shorter than this is not extracted at all
    pub min_text_len: usize,
    /// Sentences shorter than this are discarded by the segmenter
    pub min_sentence_len: usize,
    /// Relationship endpoints must have a cleaned length within these bounds
    pub endpoint_min_len: usize,
    pub endpoint_max_len: usize,
    /// Leading slice of the sentence kept on a relationship for audit
    pub context_len: usize,
    /// Characters after a relationship match scanned for tense keywords
    pub tense_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_len: 20,
            min_sentence_len: 10,
            endpoint_min_len: 5,
            endpoint_max_len: 35,
            context_len: 100,
            tense_window: 200,
        }
    }
}

/// Per-source gates deciding which extractions become graph nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub entity_min_confidence: f64,
    pub entity_min_importance: f64,
    pub entity_min_len: usize,
    pub entity_max_len: usize,
    pub max_entities_per_source: usize,
    pub relationship_min_confidence: f64,
    pub relationship_min_len: usize,
    pub max_relationships_per_source: usize,
    /// Entities strictly above both key thresholds get an INFLUENCES edge to the event
    pub key_entity_min_importance: f64,
    pub key_entity_min_confidence: f64,
    pub max_key_entities_per_source: usize,
    /// Entities strictly above this importance get a FEATURES edge from their source
    pub feature_min_importance: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            entity_min_confidence: 0.7,
            entity_min_importance: 0.6,
            entity_min_len: 5,
            entity_max_len: 40,
            max_entities_per_source: 5,
            relationship_min_confidence: 0.75,
            relationship_min_len: 5,
            max_relationships_per_source: 3,
            key_entity_min_importance: 0.75,
            key_entity_min_confidence: 0.75,
            max_key_entities_per_source: 2,
            feature_min_importance: 0.7,
        }
    }
}

/// Edge strength calibration for source-attribution edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Relevance assumed when a source does not report one
    pub default_relevance: f64,
    pub recency_boost: f64,
    pub trusted_boost: f64,
    /// Providers whose sources receive `trusted_boost`
    pub trusted_providers: Vec<String>,
    pub mention_strength: f64,
    /// Entity INFORMS edge strength as a fraction of entity confidence
    pub informs_factor: f64,
    /// DESCRIBES edge strength as a fraction of relationship confidence
    pub describes_factor: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            default_relevance: 0.5,
            recency_boost: 1.2,
            trusted_boost: 1.15,
            trusted_providers: vec!["Airweave".to_string(), "Exa AI".to_string()],
            mention_strength: 0.7,
            informs_factor: 0.9,
            describes_factor: 0.8,
        }
    }
}

impl WeightConfig {
    pub fn is_trusted(&self, provider: &str) -> bool {
        self.trusted_providers.iter().any(|p| p == provider)
    }
}

/// Transitive enrichment and causal chain scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Strength multiplier applied to synthesized transitive edges
    pub transitive_decay: f64,
    /// Per-hop multiplier beyond the first edge of a chain
    pub length_decay: f64,
    /// Factor used when two consecutive path nodes share no qualifying edge
    pub missing_edge_penalty: f64,
    pub max_chains: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            transitive_decay: 0.8,
            length_decay: 0.9,
            missing_edge_penalty: 0.3,
            max_chains: 10,
        }
    }
}

/// Probability synthesis and calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub base_probability: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    /// Half-width of the fixed confidence band around each aggregated probability
    pub interval_half_width: f64,
    pub max_predictions: usize,
    pub high_confidence: f64,
    pub medium_confidence: f64,
    /// Source titles cited per reasoning step
    pub max_cited_sources: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.5,
            min_probability: 0.1,
            max_probability: 0.9,
            interval_half_width: 0.15,
            max_predictions: 2,
            high_confidence: 0.7,
            medium_confidence: 0.5,
            max_cited_sources: 2,
        }
    }
}

/// Engine configuration. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub extraction: ExtractionConfig,
    pub quality: QualityConfig,
    pub weights: WeightConfig,
    pub chains: ChainConfig,
    pub prediction: PredictionConfig,
    /// Reject events without a title instead of substituting a placeholder
    pub strict_validation: bool,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("quality.entity_min_confidence", self.quality.entity_min_confidence),
            ("quality.entity_min_importance", self.quality.entity_min_importance),
            (
                "quality.relationship_min_confidence",
                self.quality.relationship_min_confidence,
            ),
            (
                "quality.key_entity_min_importance",
                self.quality.key_entity_min_importance,
            ),
            (
                "quality.key_entity_min_confidence",
                self.quality.key_entity_min_confidence,
            ),
            ("quality.feature_min_importance", self.quality.feature_min_importance),
            ("weights.default_relevance", self.weights.default_relevance),
            ("weights.mention_strength", self.weights.mention_strength),
            ("weights.informs_factor", self.weights.informs_factor),
            ("weights.describes_factor", self.weights.describes_factor),
            ("chains.transitive_decay", self.chains.transitive_decay),
            ("chains.length_decay", self.chains.length_decay),
            ("chains.missing_edge_penalty", self.chains.missing_edge_penalty),
            ("prediction.base_probability", self.prediction.base_probability),
            ("prediction.min_probability", self.prediction.min_probability),
            ("prediction.max_probability", self.prediction.max_probability),
            ("prediction.interval_half_width", self.prediction.interval_half_width),
            ("prediction.high_confidence", self.prediction.high_confidence),
            ("prediction.medium_confidence", self.prediction.medium_confidence),
        ];

        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.weights.recency_boost < 1.0 || self.weights.trusted_boost < 1.0 {
            return Err(ConfigError::InvalidBoost);
        }

        let bounds = [
            (
                "extraction.endpoint_len",
                self.extraction.endpoint_min_len,
                self.extraction.endpoint_max_len,
            ),
            (
                "quality.entity_len",
                self.quality.entity_min_len,
                self.quality.entity_max_len,
            ),
        ];
        for (field, min, max) in bounds {
            if min > max {
                return Err(ConfigError::InvertedBounds { field, min, max });
            }
        }

        if self.prediction.min_probability > self.prediction.max_probability {
            return Err(ConfigError::InvertedProbabilityClamp);
        }

        let caps = [
            ("quality.max_entities_per_source", self.quality.max_entities_per_source),
            (
                "quality.max_relationships_per_source",
                self.quality.max_relationships_per_source,
            ),
            ("chains.max_chains", self.chains.max_chains),
            ("prediction.max_predictions", self.prediction.max_predictions),
        ];
        for (field, cap) in caps {
            if cap == 0 {
                return Err(ConfigError::ZeroCap(field));
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("recency and trusted-provider boosts must be at least 1.0")]
    InvalidBoost,
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("prediction.min_probability exceeds prediction.max_probability")]
    InvertedProbabilityClamp,
    #[error("{0} must be greater than zero")]
    ZeroCap(&'static str),
}
