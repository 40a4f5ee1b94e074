use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexicon::{clean_entity, is_meaningful_concept, is_random_word, is_stop_word};
use crate::config::ExtractionConfig;
use crate::graph::NodeType;
use crate::relationship::{RelationType, Tense};

pub const PATTERN_METHOD: &str = "pattern";

/// Confidence assumed for relationship endpoints, which carry no score of their own.
pub const ENDPOINT_CONFIDENCE: f64 = 0.6;
pub const ENDPOINT_IMPORTANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub text: String,
    pub entity_type: NodeType,
    pub confidence: f64,
    pub importance: f64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl ExtractedEntity {
    #[must_use]
    pub fn new(text: impl Into<String>, entity_type: NodeType, confidence: f64, importance: f64) -> Self {
        Self {
            text: text.into(),
            entity_type,
            confidence,
            importance,
            method: PATTERN_METHOD.to_string(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEndpoint {
    pub text: String,
    pub entity_type: NodeType,
}

impl RelationEndpoint {
    #[must_use]
    pub fn concept(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: NodeType::Concept,
        }
    }

    #[must_use]
    pub fn statistic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_type: NodeType::Statistic,
        }
    }

    /// The endpoint as an entity observation with the default endpoint scores.
    #[must_use]
    pub fn as_entity(&self) -> ExtractedEntity {
        ExtractedEntity::new(
            self.text.clone(),
            self.entity_type,
            ENDPOINT_CONFIDENCE,
            ENDPOINT_IMPORTANCE,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRelationship {
    pub source: RelationEndpoint,
    pub target: RelationEndpoint,
    pub relation_type: RelationType,
    pub confidence: f64,
    pub temporal: Tense,
    pub context: String,
    pub source_idx: usize,
    pub sentence_idx: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceLocation {
    pub source_idx: usize,
    pub sentence_idx: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub entities: Vec<ExtractedEntity>,
    pub relationships: Vec<ExtractedRelationship>,
}

impl ExtractionOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: Self) {
        self.entities.extend(other.entities);
        self.relationships.extend(other.relationships);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }
}

pub trait EntityExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, sentence: &str) -> Vec<ExtractedEntity>;
}

pub trait RelationshipExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, sentence: &str, location: SentenceLocation) -> Vec<ExtractedRelationship>;
}

/// Static definition of one entity pattern; compiled by [`PatternEntityExtractor`].
#[derive(Debug, Clone, Copy)]
pub struct EntityPatternSpec {
    pub entity_type: NodeType,
    pub pattern: &'static str,
    pub confidence: f64,
    pub importance: f64,
}

const fn entity_pattern(
    entity_type: NodeType,
    pattern: &'static str,
    confidence: f64,
    importance: f64,
) -> EntityPatternSpec {
    EntityPatternSpec {
        entity_type,
        pattern,
        confidence,
        importance,
    }
}

pub const ENTITY_PATTERNS: &[EntityPatternSpec] = &[
    // People: titles, reporting verbs, modal verbs
    entity_pattern(
        NodeType::Person,
        r"\b(?:President|CEO|Dr\.|Mr\.|Ms\.|Mrs\.|Senator|Governor|Mayor)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        0.8,
        0.7,
    ),
    entity_pattern(
        NodeType::Person,
        r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)\s+(?:said|announced|stated|reported)",
        0.8,
        0.7,
    ),
    entity_pattern(
        NodeType::Person,
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\s+(?:will|may|could|should)",
        0.8,
        0.7,
    ),
    // Organizations
    entity_pattern(
        NodeType::Organization,
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:Inc\.|Corp\.|LLC|Ltd\.|Company)",
        0.75,
        0.6,
    ),
    entity_pattern(
        NodeType::Organization,
        r"\b([A-Z][A-Z]+)\s+(?:announced|reported|said)",
        0.75,
        0.6,
    ),
    entity_pattern(
        NodeType::Organization,
        r"\b(?:the|The)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:government|administration|committee|board)",
        0.75,
        0.6,
    ),
    // Concepts anchored on a policy, market, election or trend keyword
    entity_pattern(
        NodeType::Concept,
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\s+(?:policy|strategy|plan|program|initiative|regulation|law|bill|act|proposal|reform|legislation)",
        0.75,
        0.7,
    ),
    entity_pattern(
        NodeType::Concept,
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\s+(?:market|economy|industry|sector|trend|forecast|prediction|analysis|report)",
        0.75,
        0.7,
    ),
    entity_pattern(
        NodeType::Concept,
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2})\s+(?:election|vote|campaign|candidate|nominee|president|governor|senator)",
        0.75,
        0.7,
    ),
    entity_pattern(
        NodeType::Concept,
        r"\b(?:increased?|decreased?|rising|falling|growing|declining|surged?|plunged?)\s+([a-z]{5,}(?:\s+[a-z]{4,}){0,1})\s+(?:rate|level|price|value|demand|supply|support|opposition)",
        0.75,
        0.7,
    ),
    // Numbers and statistics; the whole match is the entity text
    entity_pattern(
        NodeType::Statistic,
        r"(?i)\b(\d+(?:\.\d+)?)\s*(?:percent|%|billion|million|thousand|points?)",
        0.9,
        0.4,
    ),
];

pub struct EntityPattern {
    pub entity_type: NodeType,
    pub regex: Regex,
    pub confidence: f64,
    pub importance: f64,
}

impl EntityPattern {
    pub fn new(spec: &EntityPatternSpec) -> Result<Self, regex::Error> {
        Ok(Self {
            entity_type: spec.entity_type,
            regex: Regex::new(spec.pattern)?,
            confidence: spec.confidence,
            importance: spec.importance,
        })
    }
}

/// Capitalization- and keyword-anchored named entity extraction.
pub struct PatternEntityExtractor {
    patterns: Vec<EntityPattern>,
    min_len: usize,
    max_len: usize,
}

impl PatternEntityExtractor {
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            patterns: Vec::new(),
            min_len: config.endpoint_min_len,
            max_len: config.endpoint_max_len,
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: EntityPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_default_patterns(config: &ExtractionConfig) -> Self {
        let mut extractor = Self::new(config);

        for spec in ENTITY_PATTERNS {
            match EntityPattern::new(spec) {
                Ok(p) => extractor.patterns.push(p),
                Err(e) => tracing::warn!("Skipping invalid entity pattern: {}", e),
            }
        }

        extractor
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn within_bounds(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_len && len <= self.max_len
    }

    fn accept_concept(&self, raw: &str) -> Option<String> {
        if !self.within_bounds(raw)
            || is_stop_word(raw)
            || !is_meaningful_concept(raw)
            || is_random_word(raw)
        {
            return None;
        }

        let concept = clean_entity(raw);
        (self.within_bounds(&concept) && !is_random_word(&concept)).then_some(concept)
    }
}

impl EntityExtractor for PatternEntityExtractor {
    fn name(&self) -> &'static str {
        "pattern_entities"
    }

    fn extract(&self, sentence: &str) -> Vec<ExtractedEntity> {
        let mut entities = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(sentence) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let captured = caps.get(1).map_or(whole.as_str(), |m| m.as_str());

                let entity = match pattern.entity_type {
                    NodeType::Concept => {
                        let Some(concept) = self.accept_concept(captured) else {
                            continue;
                        };
                        ExtractedEntity::new(
                            concept,
                            NodeType::Concept,
                            pattern.confidence,
                            pattern.importance,
                        )
                    }
                    NodeType::Statistic => {
                        let mut entity = ExtractedEntity::new(
                            whole.as_str().trim(),
                            NodeType::Statistic,
                            pattern.confidence,
                            pattern.importance,
                        );
                        entity.value = captured.parse::<f64>().ok();
                        entity
                    }
                    entity_type => ExtractedEntity::new(
                        clean_entity(captured),
                        entity_type,
                        pattern.confidence,
                        pattern.importance,
                    ),
                };

                entities.push(entity);
            }
        }

        entities
    }
}
