use regex::{Match, Regex};

use super::extractor::{
    ExtractedRelationship, RelationEndpoint, RelationshipExtractor, SentenceLocation,
};
use super::lexicon::{clean_entity, is_meaningful_concept, is_random_word, truncate_chars};
use crate::config::ExtractionConfig;
use crate::relationship::{RelationType, Tense};

/// Target used when a causal pattern names a cause but no effect can be found.
pub const DEFAULT_EFFECT: &str = "outcome";

/// Target used when a temporal pattern names only the earlier event.
pub const DEFAULT_SUBSEQUENT: &str = "subsequent event";

const EFFECT_CUES: &[&str] = &[
    r"(?i)\b(?:will|may|could|leads?\s+to|results?\s+in)\s+([^,.;]+)",
    r"(?i)\b(?:outcome|result|consequence|impact)\s+([^,.;]+)",
];

const TEMPORAL_AFTER: &str =
    r"(?i)\b(?:after|following|subsequent\s+to)\s+([^,.;]+?)(?:\s+comes?\s+([^,.;]+))?(?:[,.;]|$)";
const TEMPORAL_THEN: &str = r"(?i)([^,.;]+?)\s+(?:then|next|afterwards?)\s+([^,.;]+)";

const PERCENT_CHANGE: &str =
    r"(?i)([^,.;]+?)\s+(increased?|decreased?|rose|fell|grew|dropped)\s+(?:by\s+)?(\d+(?:\.\d+)?)\s*%";

/// How a table row turns into a regex.
#[derive(Debug, Clone, Copy)]
pub enum PatternShape {
    /// `<phrase> <verb> <phrase>`, holding only the verb alternation.
    Infix(&'static str),
    /// A complete regex used as written.
    Clause(&'static str),
}

/// Static definition of one general relationship pattern.
///
/// Group 1 captures the left-hand phrase and group 2, when the pattern has one, the
/// right-hand phrase.
#[derive(Debug, Clone, Copy)]
pub struct RelationPatternSpec {
    pub shape: PatternShape,
    pub relation: RelationType,
    pub confidence: f64,
}

impl RelationPatternSpec {
    #[must_use]
    pub fn regex_source(&self) -> String {
        match self.shape {
            PatternShape::Infix(verbs) => {
                format!(r"(?i)([^,.;]+?)\s+(?:{verbs})\b\s+([^,.;]+)")
            }
            PatternShape::Clause(pattern) => pattern.to_string(),
        }
    }
}

const fn relation_pattern(
    verbs: &'static str,
    relation: RelationType,
    confidence: f64,
) -> RelationPatternSpec {
    RelationPatternSpec {
        shape: PatternShape::Infix(verbs),
        relation,
        confidence,
    }
}

const fn clause_pattern(
    pattern: &'static str,
    relation: RelationType,
    confidence: f64,
) -> RelationPatternSpec {
    RelationPatternSpec {
        shape: PatternShape::Clause(pattern),
        relation,
        confidence,
    }
}

/// Matches text that opens with any relation verb from [`RELATION_PATTERNS`].
fn leading_verb_source() -> String {
    let verbs: Vec<&str> = RELATION_PATTERNS
        .iter()
        .filter_map(|spec| match spec.shape {
            PatternShape::Infix(verbs) => Some(verbs),
            PatternShape::Clause(_) => None,
        })
        .collect();

    format!(r"(?i)^\s*(?:{})\b", verbs.join("|"))
}

pub const RELATION_PATTERNS: &[RelationPatternSpec] = &[
    // Causal
    relation_pattern(
        r"causes?|leads?\s+to|results?\s+in|triggers?|brings?\s+about",
        RelationType::Causes,
        0.85,
    ),
    clause_pattern(
        r"(?i)\b(?:because(?:\s+of)?|due\s+to|as\s+a\s+result\s+of|caused\s+by)\s+([^,.;]+?)(?:\s+(?:will|may|could|leads?\s+to)\s+([^,.;]+))?(?:[,.;]|$)",
        RelationType::Causes,
        0.8,
    ),
    relation_pattern(
        r"gives?\s+rise\s+to|produces?|creates?|generates?",
        RelationType::GivesRiseTo,
        0.8,
    ),
    relation_pattern(
        r"induces?|stimulates?|prompts?|drives?",
        RelationType::Induces,
        0.75,
    ),
    relation_pattern(
        r"motivates?|compels?|forces?",
        RelationType::Drives,
        0.75,
    ),
    relation_pattern(
        r"results?\s+in|culminates?\s+in|ends?\s+in",
        RelationType::ResultsIn,
        0.8,
    ),
    relation_pattern(
        r"leads?\s+to|brings?\s+about|gives?\s+way\s+to",
        RelationType::LeadsTo,
        0.8,
    ),

    // Influence
    relation_pattern(
        r"influences?|affects?|impacts?|shapes?",
        RelationType::Influences,
        0.75,
    ),
    relation_pattern(
        r"plays?\s+a\s+role\s+in|contributes?\s+to|affects?",
        RelationType::Influences,
        0.7,
    ),
    relation_pattern(
        r"shapes?|molds?|forms?|sculpts?",
        RelationType::ShapedBy,
        0.7,
    ),
    relation_pattern(
        r"controls?|governs?|regulates?|manages?",
        RelationType::ControlledBy,
        0.8,
    ),
    relation_pattern(
        r"influenced\s+by|shaped\s+by|formed\s+by",
        RelationType::InfluencedBy,
        0.75,
    ),
    relation_pattern(
        r"moderates?|mediates?|adjusts?",
        RelationType::Moderates,
        0.7,
    ),

    // Effect
    relation_pattern(
        r"affects?|impacts?|touches?|reaches?",
        RelationType::Affects,
        0.75,
    ),
    relation_pattern(
        r"enhances?|improves?|strengthens?|boosts?",
        RelationType::Enhances,
        0.8,
    ),
    relation_pattern(
        r"increases?|raises?|elevates?|augments?",
        RelationType::Increases,
        0.8,
    ),
    relation_pattern(
        r"decreases?|reduces?|lowers?|diminishes?",
        RelationType::Reduces,
        0.8,
    ),
    relation_pattern(
        r"weakens?|undermines?|sabotages?",
        RelationType::Weakens,
        0.75,
    ),

    // Temporal ordering
    relation_pattern(
        r"before|prior\s+to|precedes?|earlier\s+than",
        RelationType::Precedes,
        0.8,
    ),
    relation_pattern(
        r"after|following|subsequent\s+to|comes?\s+after",
        RelationType::TemporalAfter,
        0.8,
    ),
    relation_pattern(
        r"then|next|afterwards?|subsequently",
        RelationType::Precedes,
        0.75,
    ),
    relation_pattern(
        r"predates?|antecedes?|comes?\s+before",
        RelationType::Predates,
        0.8,
    ),
    relation_pattern(
        r"succeeds?|follows?|comes?\s+after",
        RelationType::Succeeds,
        0.75,
    ),
    relation_pattern(
        r"during|while|throughout|over\s+the\s+course\s+of",
        RelationType::TemporalDuring,
        0.7,
    ),

    // Association
    relation_pattern(
        r"correlates?\s+with|is\s+associated\s+with|linked\s+to|related\s+to",
        RelationType::CorrelatesWith,
        0.6,
    ),
    relation_pattern(
        r"linked\s+with|tied\s+to|bound\s+to|attached\s+to",
        RelationType::LinkedWith,
        0.65,
    ),
    relation_pattern(
        r"coupled\s+with|paired\s+with|joined\s+with",
        RelationType::CoupledWith,
        0.65,
    ),
    relation_pattern(
        r"similar\s+to|analogous\s+to|comparable\s+to",
        RelationType::SimilarTo,
        0.7,
    ),
    relation_pattern(
        r"parallel\s+to|equivalent\s+to|equal\s+to",
        RelationType::EquivalentTo,
        0.75,
    ),
    relation_pattern(
        r"different\s+from|distinct\s+from|separate\s+from",
        RelationType::DifferentFrom,
        0.7,
    ),
    relation_pattern(
        r"opposite\s+to|contrary\s+to|divergent\s+from",
        RelationType::OppositeTo,
        0.75,
    ),

    // Dependency
    relation_pattern(
        r"depends?\s+on|relies?\s+on|requires?",
        RelationType::DependsOn,
        0.75,
    ),
    relation_pattern(
        r"necessitates?|demands?|entails?|involves?",
        RelationType::Necessitates,
        0.8,
    ),
    relation_pattern(
        r"requires?|needs?|calls?\s+for",
        RelationType::Requires,
        0.8,
    ),
    relation_pattern(
        r"based\s+on|founded\s+on|built\s+on",
        RelationType::BasedOn,
        0.75,
    ),
    relation_pattern(
        r"rooted\s+in|anchored\s+in|grounded\s+in",
        RelationType::RootedIn,
        0.75,
    ),
    relation_pattern(
        r"originates?\s+from|arises?\s+from|stems?\s+from",
        RelationType::OriginatesFrom,
        0.75,
    ),

    // Prevention
    relation_pattern(
        r"prevents?|blocks?|stops?|hinders?|reduces?",
        RelationType::Prevents,
        0.7,
    ),
    relation_pattern(
        r"obstructs?|impedes?|impaired?",
        RelationType::Blocks,
        0.75,
    ),
    relation_pattern(
        r"eliminates?|removes?|eradicates?",
        RelationType::Eliminates,
        0.8,
    ),
    relation_pattern(
        r"destroys?|abolishes?|nullifies?",
        RelationType::Destroys,
        0.8,
    ),
    relation_pattern(
        r"opposes?|resists?|counters?|combats?",
        RelationType::Opposes,
        0.75,
    ),
    relation_pattern(
        r"refutes?|disproves?|challenges?",
        RelationType::Refutes,
        0.75,
    ),

    // Support
    relation_pattern(
        r"enables?|allows?|permits?|facilitates?",
        RelationType::Enables,
        0.8,
    ),
    relation_pattern(
        r"supports?|backs?|endorses?|advocates?",
        RelationType::Supports,
        0.75,
    ),
    relation_pattern(
        r"reinforces?|strengthens?|bolsters?",
        RelationType::Reinforces,
        0.8,
    ),
    relation_pattern(
        r"confirms?|validates?|verifies?",
        RelationType::Confirms,
        0.8,
    ),
    relation_pattern(
        r"complements?|supplements?|augments?",
        RelationType::Complements,
        0.75,
    ),
    relation_pattern(
        r"cooperates?\s+with|collaborates?\s+with|works?\s+with",
        RelationType::CooperatesWith,
        0.75,
    ),

    // Prediction
    relation_pattern(
        r"predicts?|forecasts?|suggests?|indicates?",
        RelationType::Predicts,
        0.7,
    ),
    relation_pattern(
        r"projects?|estimates?|calculates?|measures?",
        RelationType::Forecasts,
        0.75,
    ),
    relation_pattern(
        r"signals?|points?\s+to|hints?\s+at",
        RelationType::Signals,
        0.7,
    ),
    relation_pattern(
        r"reveals?|shows?|demonstrates?",
        RelationType::Reveals,
        0.75,
    ),
    relation_pattern(
        r"proves?|establishes?|confirms?",
        RelationType::Proves,
        0.8,
    ),

    // Composition
    relation_pattern(
        r"has|contains?|includes?|features?",
        RelationType::Has,
        0.7,
    ),
    relation_pattern(
        r"consists?\s+of|comprises?|made\s+up\s+of",
        RelationType::ConsistsOf,
        0.75,
    ),
    relation_pattern(
        r"characterized\s+by|defined\s+by|marked\s+by",
        RelationType::CharacterizedBy,
        0.7,
    ),
    relation_pattern(
        r"owned\s+by|belongs?\s+to|part\s+of",
        RelationType::BelongsTo,
        0.75,
    ),
    relation_pattern(
        r"member\s+of|component\s+of|element\s+of",
        RelationType::PartOf,
        0.75,
    ),
    relation_pattern(
        r"aspect\s+of|facet\s+of|feature\s+of",
        RelationType::AspectOf,
        0.7,
    ),

    // Transformation
    relation_pattern(
        r"transforms?|converts?|changes?|alters?",
        RelationType::Transforms,
        0.75,
    ),
    relation_pattern(
        r"replaces?|substitutes?|supersedes?",
        RelationType::Replaces,
        0.8,
    ),
    relation_pattern(
        r"maintains?|preserves?|keeps?|retains?",
        RelationType::Maintains,
        0.75,
    ),

    // Competition and cooperation
    relation_pattern(
        r"competes?\s+with|rivals?|vies?\s+with",
        RelationType::CompetesWith,
        0.75,
    ),
    relation_pattern(
        r"struggles?\s+with|contends?\s+with|fights?\s+with",
        RelationType::StrugglesWith,
        0.7,
    ),
    relation_pattern(
        r"partners?\s+with|allies?\s+with",
        RelationType::PartnersWith,
        0.75,
    ),

    // Spatial
    relation_pattern(
        r"near|close\s+to|adjacent\s+to",
        RelationType::SpatialNear,
        0.6,
    ),
    relation_pattern(
        r"far\s+from|distant\s+from|away\s+from",
        RelationType::SpatialFar,
        0.6,
    ),
    relation_pattern(
        r"within|inside|contained\s+in",
        RelationType::SpatialWithin,
        0.7,
    ),
    relation_pattern(
        r"located\s+in|positioned\s+in|situated\s+in",
        RelationType::LocatedIn,
        0.7,
    ),

    // Evaluation
    relation_pattern(
        r"implies?|suggests?|indicates?|hints?\s+at",
        RelationType::Implies,
        0.7,
    ),
    relation_pattern(
        r"means?|signifies?|represents?",
        RelationType::Means,
        0.75,
    ),
    relation_pattern(
        r"studies?|investigates?|researches?",
        RelationType::Studies,
        0.7,
    ),
    relation_pattern(
        r"evaluates?|assesses?|analyzes?",
        RelationType::Evaluates,
        0.75,
    ),
];

pub struct RelationPattern {
    pub relation: RelationType,
    pub regex: Regex,
    pub confidence: f64,
}

impl RelationPattern {
    pub fn new(spec: &RelationPatternSpec) -> Result<Self, regex::Error> {
        Ok(Self {
            relation: spec.relation,
            regex: Regex::new(&spec.regex_source())?,
            confidence: spec.confidence,
        })
    }
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Skipping invalid relationship pattern: {}", e);
                None
            }
        })
        .collect()
}

/// Length, random-word and meaningful-concept checks shared by every relationship
/// endpoint, plus the tense and context annotations every relationship carries.
#[derive(Debug, Clone, Copy)]
struct EndpointRules {
    min_len: usize,
    max_len: usize,
    context_len: usize,
    tense_window: usize,
}

impl EndpointRules {
    fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_len: config.endpoint_min_len,
            max_len: config.endpoint_max_len,
            context_len: config.context_len,
            tense_window: config.tense_window,
        }
    }

    fn accept(&self, raw: &str) -> Option<String> {
        let text = clean_entity(raw);
        let len = text.chars().count();

        (len >= self.min_len
            && len <= self.max_len
            && !is_random_word(&text)
            && is_meaningful_concept(&text))
        .then_some(text)
    }

    fn tense(&self, sentence: &str, matched: &Match<'_>) -> Tense {
        let window: String = sentence[matched.end()..].chars().take(self.tense_window).collect();
        Tense::infer(&format!("{} {}", matched.as_str(), window))
    }

    fn context(&self, sentence: &str) -> String {
        truncate_chars(sentence, self.context_len)
    }

    #[allow(clippy::too_many_arguments)]
    fn relationship(
        &self,
        sentence: &str,
        matched: &Match<'_>,
        source: RelationEndpoint,
        target: RelationEndpoint,
        relation_type: RelationType,
        confidence: f64,
        location: SentenceLocation,
    ) -> ExtractedRelationship {
        ExtractedRelationship {
            source,
            target,
            relation_type,
            confidence,
            temporal: self.tense(sentence, matched),
            context: self.context(sentence),
            source_idx: location.source_idx,
            sentence_idx: location.sentence_idx,
            change: None,
        }
    }
}

/// Matches the fixed relationship vocabulary table.
pub struct GeneralRelationExtractor {
    patterns: Vec<RelationPattern>,
    effect_cues: Vec<Regex>,
    leading_verb: Option<Regex>,
    rules: EndpointRules,
}

impl GeneralRelationExtractor {
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            patterns: Vec::new(),
            effect_cues: compile_all(EFFECT_CUES),
            leading_verb: Regex::new(&leading_verb_source())
                .map_err(|e| tracing::warn!("Skipping relation verb check: {}", e))
                .ok(),
            rules: EndpointRules::new(config),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: RelationPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_default_patterns(config: &ExtractionConfig) -> Self {
        let mut extractor = Self::new(config);

        for spec in RELATION_PATTERNS {
            match RelationPattern::new(spec) {
                Ok(p) => extractor.patterns.push(p),
                Err(e) => tracing::warn!("Skipping invalid relationship pattern: {}", e),
            }
        }

        extractor
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Looks for an outcome cue in the text following a cause phrase.
    fn infer_effect(&self, after_cause: &str) -> String {
        self.effect_cues
            .iter()
            .find_map(|cue| cue.captures(after_cause)?.get(1))
            .map_or_else(|| DEFAULT_EFFECT.to_string(), |m| clean_entity(m.as_str()))
    }

    /// A right-hand phrase opening with a relation verb is the tail of a longer match,
    /// e.g. "causes factory expansion" out of "export demand causes factory expansion".
    fn starts_with_verb(&self, effect: &str) -> bool {
        self.leading_verb
            .as_ref()
            .is_some_and(|re| re.is_match(effect))
    }
}

impl RelationshipExtractor for GeneralRelationExtractor {
    fn name(&self) -> &'static str {
        "general_relations"
    }

    fn extract(&self, sentence: &str, location: SentenceLocation) -> Vec<ExtractedRelationship> {
        let mut relationships = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(sentence) {
                let (Some(whole), Some(cause)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let effect = caps.get(2).map_or_else(
                    || self.infer_effect(&sentence[cause.end()..]),
                    |m| m.as_str().to_string(),
                );
                if self.starts_with_verb(&effect) {
                    continue;
                }

                let (Some(source), Some(target)) =
                    (self.rules.accept(cause.as_str()), self.rules.accept(&effect))
                else {
                    continue;
                };

                relationships.push(self.rules.relationship(
                    sentence,
                    &whole,
                    RelationEndpoint::concept(source),
                    RelationEndpoint::concept(target),
                    pattern.relation,
                    pattern.confidence,
                    location,
                ));
            }
        }

        relationships
    }
}

/// Explicit sequencing language: "after X comes Y" and "X then Y".
pub struct TemporalRelationExtractor {
    patterns: Vec<(Regex, f64)>,
    rules: EndpointRules,
}

impl TemporalRelationExtractor {
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        let patterns = [(TEMPORAL_AFTER, 0.8), (TEMPORAL_THEN, 0.75)]
            .into_iter()
            .filter_map(|(pattern, confidence)| match Regex::new(pattern) {
                Ok(regex) => Some((regex, confidence)),
                Err(e) => {
                    tracing::warn!("Skipping invalid temporal pattern: {}", e);
                    None
                }
            })
            .collect();

        Self {
            patterns,
            rules: EndpointRules::new(config),
        }
    }
}

impl RelationshipExtractor for TemporalRelationExtractor {
    fn name(&self) -> &'static str {
        "temporal_relations"
    }

    fn extract(&self, sentence: &str, location: SentenceLocation) -> Vec<ExtractedRelationship> {
        let mut relationships = Vec::new();

        for (regex, confidence) in &self.patterns {
            for caps in regex.captures_iter(sentence) {
                let (Some(whole), Some(earlier)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let later = caps.get(2).map_or(DEFAULT_SUBSEQUENT, |m| m.as_str());

                let (Some(source), Some(target)) =
                    (self.rules.accept(earlier.as_str()), self.rules.accept(later))
                else {
                    continue;
                };

                relationships.push(self.rules.relationship(
                    sentence,
                    &whole,
                    RelationEndpoint::concept(source),
                    RelationEndpoint::concept(target),
                    RelationType::Precedes,
                    *confidence,
                    location,
                ));
            }
        }

        relationships
    }
}

/// "<subject> increased/decreased by N%" linked to a synthesized statistic.
pub struct QuantitativeRelationExtractor {
    regex: Option<Regex>,
    rules: EndpointRules,
}

impl QuantitativeRelationExtractor {
    pub const CONFIDENCE: f64 = 0.9;

    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        let regex = Regex::new(PERCENT_CHANGE)
            .map_err(|e| tracing::warn!("Skipping invalid quantitative pattern: {}", e))
            .ok();

        Self {
            regex,
            rules: EndpointRules::new(config),
        }
    }
}

fn is_upward(verb: &str) -> bool {
    let verb = verb.to_lowercase();
    verb.starts_with("incr") || verb == "rose" || verb == "grew"
}

impl RelationshipExtractor for QuantitativeRelationExtractor {
    fn name(&self) -> &'static str {
        "quantitative_relations"
    }

    fn extract(&self, sentence: &str, location: SentenceLocation) -> Vec<ExtractedRelationship> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        let mut relationships = Vec::new();

        for caps in regex.captures_iter(sentence) {
            let (Some(whole), Some(subject), Some(verb), Some(amount)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let Ok(magnitude) = amount.as_str().parse::<f64>() else {
                continue;
            };

            let (direction, change) = if is_upward(verb.as_str()) {
                ("increase", magnitude)
            } else {
                ("decrease", -magnitude)
            };
            let label = format!("{direction} of {}%", magnitude.abs());

            let (Some(source), Some(target)) =
                (self.rules.accept(subject.as_str()), self.rules.accept(&label))
            else {
                continue;
            };

            let mut relationship = self.rules.relationship(
                sentence,
                &whole,
                RelationEndpoint::concept(source),
                RelationEndpoint::statistic(target),
                RelationType::Affects,
                Self::CONFIDENCE,
                location,
            );
            relationship.temporal = Tense::Past;
            relationship.change = Some(change);
            relationships.push(relationship);
        }

        relationships
    }
}
