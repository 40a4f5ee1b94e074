use super::extractor::{
    EntityExtractor, ExtractionOutput, PatternEntityExtractor, RelationshipExtractor,
    SentenceLocation,
};
use super::relations::{
    GeneralRelationExtractor, QuantitativeRelationExtractor, TemporalRelationExtractor,
};
use super::resolver::{deduplicate_relationships, merge_entities};
use super::segmenter::split_sentences;
use crate::config::ExtractionConfig;

/// Runs every extractor over each sentence of a source text and merges the results.
pub struct ExtractionPipeline {
    entity_extractors: Vec<Box<dyn EntityExtractor>>,
    relationship_extractors: Vec<Box<dyn RelationshipExtractor>>,
    min_text_len: usize,
    min_sentence_len: usize,
}

impl ExtractionPipeline {
    /// A pipeline with no extractors registered.
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            entity_extractors: Vec::new(),
            relationship_extractors: Vec::new(),
            min_text_len: config.min_text_len,
            min_sentence_len: config.min_sentence_len,
        }
    }

    /// Entity patterns, then the general, temporal and quantitative relationship passes.
    #[must_use]
    pub fn with_default_extractors(config: &ExtractionConfig) -> Self {
        Self::new(config)
            .with_entity_extractor(Box::new(PatternEntityExtractor::with_default_patterns(
                config,
            )))
            .with_relationship_extractor(Box::new(
                GeneralRelationExtractor::with_default_patterns(config),
            ))
            .with_relationship_extractor(Box::new(TemporalRelationExtractor::new(config)))
            .with_relationship_extractor(Box::new(QuantitativeRelationExtractor::new(config)))
    }

    #[must_use]
    pub fn with_entity_extractor(mut self, extractor: Box<dyn EntityExtractor>) -> Self {
        self.entity_extractors.push(extractor);
        self
    }

    #[must_use]
    pub fn with_relationship_extractor(
        mut self,
        extractor: Box<dyn RelationshipExtractor>,
    ) -> Self {
        self.relationship_extractors.push(extractor);
        self
    }

    #[must_use]
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.entity_extractors
            .iter()
            .map(|e| e.name())
            .chain(self.relationship_extractors.iter().map(|e| e.name()))
            .collect()
    }

    /// Extracts one source's text. Entities are merged by key and relationships
    /// deduplicated by triple; text shorter than the configured minimum yields nothing.
    #[must_use]
    pub fn extract(&self, text: &str, source_idx: usize) -> ExtractionOutput {
        let mut output = ExtractionOutput::new();

        if text.chars().count() < self.min_text_len {
            return output;
        }

        for (sentence_idx, sentence) in split_sentences(text, self.min_sentence_len).enumerate() {
            let location = SentenceLocation {
                source_idx,
                sentence_idx,
            };

            for extractor in &self.entity_extractors {
                output.entities.extend(extractor.extract(sentence));
            }
            for extractor in &self.relationship_extractors {
                output
                    .relationships
                    .extend(extractor.extract(sentence, location));
            }
        }

        ExtractionOutput {
            entities: merge_entities(output.entities),
            relationships: deduplicate_relationships(output.relationships),
        }
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::with_default_extractors(&ExtractionConfig::default())
    }
}
