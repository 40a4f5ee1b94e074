use serde::{Deserialize, Serialize};

/// Typed relationship carried by a graph edge.
///
/// Source-attribution variants (`Informs`, `Contains`, ...) are emitted by the graph
/// builder; the rest come from the extraction pattern tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    // Source attribution
    Informs,
    Contains,
    Features,
    Mentions,
    Describes,

    // Causal
    Causes,
    GivesRiseTo,
    Induces,
    Drives,
    ResultsIn,
    LeadsTo,

    // Influence
    Influences,
    ShapedBy,
    ControlledBy,
    InfluencedBy,
    Moderates,

    // Effect
    Affects,
    Enhances,
    Increases,
    Reduces,
    Weakens,

    // Temporal
    Precedes,
    TemporalAfter,
    Predates,
    Succeeds,
    TemporalDuring,

    // Association
    CorrelatesWith,
    LinkedWith,
    CoupledWith,
    SimilarTo,
    EquivalentTo,
    DifferentFrom,
    OppositeTo,

    // Dependency
    DependsOn,
    Necessitates,
    Requires,
    BasedOn,
    RootedIn,
    OriginatesFrom,

    // Prevention
    Prevents,
    Blocks,
    Eliminates,
    Destroys,
    Opposes,
    Refutes,

    // Support
    Enables,
    Supports,
    Reinforces,
    Confirms,
    Complements,
    CooperatesWith,

    // Prediction
    Predicts,
    Forecasts,
    Signals,
    Reveals,
    Proves,

    // Composition
    Has,
    ConsistsOf,
    CharacterizedBy,
    BelongsTo,
    PartOf,
    AspectOf,

    // Transformation
    Transforms,
    Replaces,
    Maintains,

    // Competition/cooperation
    CompetesWith,
    StrugglesWith,
    PartnersWith,

    // Spatial
    SpatialNear,
    SpatialFar,
    SpatialWithin,
    LocatedIn,

    // Evaluation
    Implies,
    Means,
    Studies,
    Evaluates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationCategory {
    Structural,
    Causal,
    Influence,
    Effect,
    Temporal,
    Association,
    Dependency,
    Prevention,
    Support,
    Predictive,
    Compositional,
    Transformative,
    Competitive,
    Spatial,
    Evaluative,
}

impl RelationType {
    pub const ALL: [Self; 76] = [
        Self::Informs,
        Self::Contains,
        Self::Features,
        Self::Mentions,
        Self::Describes,
        Self::Causes,
        Self::GivesRiseTo,
        Self::Induces,
        Self::Drives,
        Self::ResultsIn,
        Self::LeadsTo,
        Self::Influences,
        Self::ShapedBy,
        Self::ControlledBy,
        Self::InfluencedBy,
        Self::Moderates,
        Self::Affects,
        Self::Enhances,
        Self::Increases,
        Self::Reduces,
        Self::Weakens,
        Self::Precedes,
        Self::TemporalAfter,
        Self::Predates,
        Self::Succeeds,
        Self::TemporalDuring,
        Self::CorrelatesWith,
        Self::LinkedWith,
        Self::CoupledWith,
        Self::SimilarTo,
        Self::EquivalentTo,
        Self::DifferentFrom,
        Self::OppositeTo,
        Self::DependsOn,
        Self::Necessitates,
        Self::Requires,
        Self::BasedOn,
        Self::RootedIn,
        Self::OriginatesFrom,
        Self::Prevents,
        Self::Blocks,
        Self::Eliminates,
        Self::Destroys,
        Self::Opposes,
        Self::Refutes,
        Self::Enables,
        Self::Supports,
        Self::Reinforces,
        Self::Confirms,
        Self::Complements,
        Self::CooperatesWith,
        Self::Predicts,
        Self::Forecasts,
        Self::Signals,
        Self::Reveals,
        Self::Proves,
        Self::Has,
        Self::ConsistsOf,
        Self::CharacterizedBy,
        Self::BelongsTo,
        Self::PartOf,
        Self::AspectOf,
        Self::Transforms,
        Self::Replaces,
        Self::Maintains,
        Self::CompetesWith,
        Self::StrugglesWith,
        Self::PartnersWith,
        Self::SpatialNear,
        Self::SpatialFar,
        Self::SpatialWithin,
        Self::LocatedIn,
        Self::Implies,
        Self::Means,
        Self::Studies,
        Self::Evaluates,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informs => "INFORMS",
            Self::Contains => "CONTAINS",
            Self::Features => "FEATURES",
            Self::Mentions => "MENTIONS",
            Self::Describes => "DESCRIBES",
            Self::Causes => "CAUSES",
            Self::GivesRiseTo => "GIVES_RISE_TO",
            Self::Induces => "INDUCES",
            Self::Drives => "DRIVES",
            Self::ResultsIn => "RESULTS_IN",
            Self::LeadsTo => "LEADS_TO",
            Self::Influences => "INFLUENCES",
            Self::ShapedBy => "SHAPED_BY",
            Self::ControlledBy => "CONTROLLED_BY",
            Self::InfluencedBy => "INFLUENCED_BY",
            Self::Moderates => "MODERATES",
            Self::Affects => "AFFECTS",
            Self::Enhances => "ENHANCES",
            Self::Increases => "INCREASES",
            Self::Reduces => "REDUCES",
            Self::Weakens => "WEAKENS",
            Self::Precedes => "PRECEDES",
            Self::TemporalAfter => "TEMPORAL_AFTER",
            Self::Predates => "PREDATES",
            Self::Succeeds => "SUCCEEDS",
            Self::TemporalDuring => "TEMPORAL_DURING",
            Self::CorrelatesWith => "CORRELATES_WITH",
            Self::LinkedWith => "LINKED_WITH",
            Self::CoupledWith => "COUPLED_WITH",
            Self::SimilarTo => "SIMILAR_TO",
            Self::EquivalentTo => "EQUIVALENT_TO",
            Self::DifferentFrom => "DIFFERENT_FROM",
            Self::OppositeTo => "OPPOSITE_TO",
            Self::DependsOn => "DEPENDS_ON",
            Self::Necessitates => "NECESSITATES",
            Self::Requires => "REQUIRES",
            Self::BasedOn => "BASED_ON",
            Self::RootedIn => "ROOTED_IN",
            Self::OriginatesFrom => "ORIGINATES_FROM",
            Self::Prevents => "PREVENTS",
            Self::Blocks => "BLOCKS",
            Self::Eliminates => "ELIMINATES",
            Self::Destroys => "DESTROYS",
            Self::Opposes => "OPPOSES",
            Self::Refutes => "REFUTES",
            Self::Enables => "ENABLES",
            Self::Supports => "SUPPORTS",
            Self::Reinforces => "REINFORCES",
            Self::Confirms => "CONFIRMS",
            Self::Complements => "COMPLEMENTS",
            Self::CooperatesWith => "COOPERATES_WITH",
            Self::Predicts => "PREDICTS",
            Self::Forecasts => "FORECASTS",
            Self::Signals => "SIGNALS",
            Self::Reveals => "REVEALS",
            Self::Proves => "PROVES",
            Self::Has => "HAS",
            Self::ConsistsOf => "CONSISTS_OF",
            Self::CharacterizedBy => "CHARACTERIZED_BY",
            Self::BelongsTo => "BELONGS_TO",
            Self::PartOf => "PART_OF",
            Self::AspectOf => "ASPECT_OF",
            Self::Transforms => "TRANSFORMS",
            Self::Replaces => "REPLACES",
            Self::Maintains => "MAINTAINS",
            Self::CompetesWith => "COMPETES_WITH",
            Self::StrugglesWith => "STRUGGLES_WITH",
            Self::PartnersWith => "PARTNERS_WITH",
            Self::SpatialNear => "SPATIAL_NEAR",
            Self::SpatialFar => "SPATIAL_FAR",
            Self::SpatialWithin => "SPATIAL_WITHIN",
            Self::LocatedIn => "LOCATED_IN",
            Self::Implies => "IMPLIES",
            Self::Means => "MEANS",
            Self::Studies => "STUDIES",
            Self::Evaluates => "EVALUATES",
        }
    }

    #[must_use]
    pub fn category(&self) -> RelationCategory {
        match self {
            Self::Informs
            | Self::Contains
            | Self::Features
            | Self::Mentions
            | Self::Describes => RelationCategory::Structural,
            Self::Causes
            | Self::GivesRiseTo
            | Self::Induces
            | Self::Drives
            | Self::ResultsIn
            | Self::LeadsTo => RelationCategory::Causal,
            Self::Influences
            | Self::ShapedBy
            | Self::ControlledBy
            | Self::InfluencedBy
            | Self::Moderates => RelationCategory::Influence,
            Self::Affects
            | Self::Enhances
            | Self::Increases
            | Self::Reduces
            | Self::Weakens => RelationCategory::Effect,
            Self::Precedes
            | Self::TemporalAfter
            | Self::Predates
            | Self::Succeeds
            | Self::TemporalDuring => RelationCategory::Temporal,
            Self::CorrelatesWith
            | Self::LinkedWith
            | Self::CoupledWith
            | Self::SimilarTo
            | Self::EquivalentTo
            | Self::DifferentFrom
            | Self::OppositeTo => RelationCategory::Association,
            Self::DependsOn
            | Self::Necessitates
            | Self::Requires
            | Self::BasedOn
            | Self::RootedIn
            | Self::OriginatesFrom => RelationCategory::Dependency,
            Self::Prevents
            | Self::Blocks
            | Self::Eliminates
            | Self::Destroys
            | Self::Opposes
            | Self::Refutes => RelationCategory::Prevention,
            Self::Enables
            | Self::Supports
            | Self::Reinforces
            | Self::Confirms
            | Self::Complements
            | Self::CooperatesWith => RelationCategory::Support,
            Self::Predicts
            | Self::Forecasts
            | Self::Signals
            | Self::Reveals
            | Self::Proves => RelationCategory::Predictive,
            Self::Has
            | Self::ConsistsOf
            | Self::CharacterizedBy
            | Self::BelongsTo
            | Self::PartOf
            | Self::AspectOf => RelationCategory::Compositional,
            Self::Transforms | Self::Replaces | Self::Maintains => RelationCategory::Transformative,
            Self::CompetesWith
            | Self::StrugglesWith
            | Self::PartnersWith => RelationCategory::Competitive,
            Self::SpatialNear
            | Self::SpatialFar
            | Self::SpatialWithin
            | Self::LocatedIn => RelationCategory::Spatial,
            Self::Implies
            | Self::Means
            | Self::Studies
            | Self::Evaluates => RelationCategory::Evaluative,
        }
    }

    /// Relationships a causal chain may traverse on its way to the event node.
    #[must_use]
    pub fn is_causal_link(&self) -> bool {
        matches!(
            self,
            Self::Causes | Self::Influences | Self::Affects | Self::Predicts
        )
    }

    /// Relationships composed by transitive enrichment (A->B->C implies A->C).
    #[must_use]
    pub fn is_transitive_link(&self) -> bool {
        matches!(self, Self::Causes | Self::Influences)
    }

    #[must_use]
    pub fn is_source_attribution(&self) -> bool {
        self.category() == RelationCategory::Structural
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::InvalidRelationshipType(s.to_string()))
    }
}

/// Grammatical tense inferred from keywords around a relationship match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Past,
    Present,
    Future,
    #[default]
    Unknown,
}

const PAST_WORDS: &[&str] = &["was", "were", "had", "occurred", "happened", "previous"];
const PRESENT_WORDS: &[&str] = &["is", "are", "current", "now", "ongoing"];
const FUTURE_WORDS: &[&str] = &[
    "will",
    "may",
    "could",
    "might",
    "expected",
    "forecast",
    "predicted",
];

impl Tense {
    /// Looks up tense keywords as substrings; past wins over present, present over future.
    ///
    /// Keywords are not word-bounded, so "crisis" counts as present through "is".
    #[must_use]
    pub fn infer(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has_any = |table: &[&str]| table.iter().any(|w| lower.contains(w));

        if has_any(PAST_WORDS) {
            Self::Past
        } else if has_any(PRESENT_WORDS) {
            Self::Present
        } else if has_any(FUTURE_WORDS) {
            Self::Future
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Present => "present",
            Self::Future => "future",
            Self::Unknown => "unknown",
        }
    }
}
