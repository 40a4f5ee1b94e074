mod extractor;
mod lexicon;
mod pipeline;
mod relations;
mod resolver;
mod segmenter;

pub use extractor::{
    EntityExtractor, EntityPattern, EntityPatternSpec, ExtractedEntity, ExtractedRelationship,
    ExtractionOutput, PatternEntityExtractor, RelationEndpoint, RelationshipExtractor,
    SentenceLocation, ENDPOINT_CONFIDENCE, ENDPOINT_IMPORTANCE, ENTITY_PATTERNS, PATTERN_METHOD,
};
pub use lexicon::{clean_entity, is_meaningful_concept, is_random_word, is_stop_word, truncate_chars};
pub use pipeline::ExtractionPipeline;
pub use relations::{
    GeneralRelationExtractor, PatternShape, QuantitativeRelationExtractor, RelationPattern,
    RelationPatternSpec, TemporalRelationExtractor, DEFAULT_EFFECT, DEFAULT_SUBSEQUENT,
    RELATION_PATTERNS,
};
pub use resolver::{
    dedup_key, deduplicate_relationships, entity_id, merge_entities, normalize, EntityIndex,
    ENTITY_ID_PREFIX,
};
pub use segmenter::{split_sentences, Sentences};
