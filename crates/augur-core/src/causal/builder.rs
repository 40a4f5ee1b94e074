use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::chains::find_causal_chains;
use super::enrich::enrich_graph;
use super::predict::{predict_from_causality, Prediction};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graph::{
    Edge, EdgeProperties, EventDetail, Graph, GraphMetadata, Node, NodeDetail, NodeProperties,
    NodeType, SourceAttribution, SourceDetail,
};
use crate::ingest::{
    entity_id, is_random_word, truncate_chars, EntityIndex, ExtractedEntity,
    ExtractedRelationship, ExtractionOutput, ExtractionPipeline, PATTERN_METHOD,
};
use crate::relationship::RelationType;
use crate::source::{EventDescriptor, SourceRecord};

pub const UNTITLED_EVENT: &str = "Untitled event";

const EVENT_NODE_SIZE: f64 = 20.0;
const SOURCE_NODE_SIZE: f64 = 8.0;
const SOURCE_LABEL_LEN: usize = 50;

/// Graph and predictions from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub graph: Graph,
    pub predictions: Vec<Prediction>,
}

/// Builds causal graphs from source text and turns them into predictions.
///
/// The engine holds only configuration and compiled extractors. Every build uses its
/// own entity index, so one engine can serve concurrent analyses.
pub struct CausalityEngine {
    config: EngineConfig,
    pipeline: ExtractionPipeline,
}

impl CausalityEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let pipeline = ExtractionPipeline::with_default_extractors(&config.extraction);
        Self { config, pipeline }
    }

    #[must_use]
    pub fn with_pipeline(mut self, pipeline: ExtractionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Relevance (or the default), boosted for recent and trusted-provider sources,
    /// capped at 1.
    #[must_use]
    pub fn calculate_edge_weight(&self, source: &SourceRecord) -> f64 {
        let weights = &self.config.weights;
        let mut weight = source.relevance_score.unwrap_or(weights.default_relevance);

        if source.is_recent.unwrap_or(false) {
            weight *= weights.recency_boost;
        }
        if source.source.as_deref().is_some_and(|p| weights.is_trusted(p)) {
            weight *= weights.trusted_boost;
        }

        weight.min(1.0)
    }

    pub fn build_causal_graph(
        &self,
        sources: &[SourceRecord],
        event: &EventDescriptor,
    ) -> Result<Graph> {
        let title = self.event_title(event)?;
        let mut build = GraphBuild::new(&self.config, event, title);

        for (idx, source) in sources.iter().enumerate() {
            let extraction = self.pipeline.extract(&source.text, idx);
            build.add_source(idx, source, self.calculate_edge_weight(source), extraction);
        }

        Ok(build.finish(sources.len()))
    }

    #[must_use]
    pub fn predict_from_causality(&self, event: &EventDescriptor, graph: &Graph) -> Vec<Prediction> {
        debug!("Predicting outcomes for event {}", event.node_id());
        predict_from_causality(graph, &self.config.prediction)
    }

    pub fn analyze(&self, sources: &[SourceRecord], event: &EventDescriptor) -> Result<Analysis> {
        let graph = self.build_causal_graph(sources, event)?;
        let predictions = self.predict_from_causality(event, &graph);
        Ok(Analysis { graph, predictions })
    }

    fn event_title(&self, event: &EventDescriptor) -> Result<String> {
        if !event.title.trim().is_empty() {
            return Ok(event.title.clone());
        }
        if self.config.strict_validation {
            return Err(Error::InvalidEvent(format!(
                "event {} has a blank title",
                event.node_id()
            )));
        }

        warn!("Event {} has no title, using placeholder", event.node_id());
        Ok(UNTITLED_EVENT.to_string())
    }
}

impl Default for CausalityEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Attribution shared by every edge drawn from one source.
struct SourceContext {
    id: String,
    idx: usize,
    title: String,
    url: String,
    provider: String,
    relevance: f64,
}

impl SourceContext {
    fn edge_properties(&self) -> EdgeProperties {
        EdgeProperties {
            source_idx: Some(self.idx),
            source_title: Some(self.title.clone()),
            source_url: Some(self.url.clone()),
            ..EdgeProperties::default()
        }
    }

    fn attribution(&self, entity: &ExtractedEntity) -> SourceAttribution {
        SourceAttribution {
            source_id: self.id.clone(),
            source_title: self.title.clone(),
            source_url: self.url.clone(),
            source_type: self.provider.clone(),
            relevance: self.relevance,
            extraction_method: entity.method.clone(),
            confidence: entity.confidence,
        }
    }
}

/// State of one `build_causal_graph` call.
struct GraphBuild<'a> {
    config: &'a EngineConfig,
    event_id: String,
    index: EntityIndex,
    edges: Vec<Edge>,
}

impl<'a> GraphBuild<'a> {
    fn new(config: &'a EngineConfig, event: &EventDescriptor, title: String) -> Self {
        let event_id = event.node_id();

        let properties = NodeProperties {
            detail: Some(NodeDetail::Event(EventDetail {
                title: title.clone(),
                volume: event.volume.unwrap_or(0.0),
                liquidity: event.liquidity.unwrap_or(0.0),
                close_date: event.close_date.clone(),
            })),
            ..NodeProperties::new(1.0, 1.0)
        };

        let mut index = EntityIndex::new();
        index.insert_node(
            Node::new(event_id.clone(), title, NodeType::Event)
                .with_size(EVENT_NODE_SIZE)
                .with_properties(properties),
        );

        Self {
            config,
            event_id,
            index,
            edges: Vec::new(),
        }
    }

    fn add_source(
        &mut self,
        idx: usize,
        source: &SourceRecord,
        informs_strength: f64,
        extraction: ExtractionOutput,
    ) {
        let relevance = source
            .relevance_score
            .unwrap_or(self.config.weights.default_relevance);
        let ctx = SourceContext {
            id: format!("source_{idx}"),
            idx,
            title: source.display_title(idx),
            url: source.url.clone(),
            provider: source.provider().to_string(),
            relevance,
        };

        let properties = NodeProperties {
            detail: Some(NodeDetail::Source(SourceDetail {
                url: ctx.url.clone(),
                relevance,
                text: source.text.clone(),
                source_type: ctx.provider.clone(),
            })),
            ..NodeProperties::new(1.0, relevance)
        };
        self.index.insert_node(
            Node::new(
                ctx.id.clone(),
                truncate_chars(&ctx.title, SOURCE_LABEL_LEN),
                NodeType::Source,
            )
            .with_size(SOURCE_NODE_SIZE)
            .with_properties(properties),
        );

        self.edges.push(
            Edge::new(&ctx.id, &self.event_id, RelationType::Informs, informs_strength)
                .with_properties(EdgeProperties {
                    relevance: Some(relevance),
                    ..EdgeProperties::default()
                }),
        );

        let entities = self.quality_entities(extraction.entities);
        let relationships = self.quality_relationships(extraction.relationships);

        debug!(
            "Source {} kept {} entities and {} relationships",
            idx,
            entities.len(),
            relationships.len()
        );

        let linked = self.add_entities(&ctx, &entities);
        self.add_relationships(&ctx, &relationships);
        self.link_key_entities(&linked);
    }

    fn quality_entities(&self, entities: Vec<ExtractedEntity>) -> Vec<ExtractedEntity> {
        let quality = &self.config.quality;

        entities
            .into_iter()
            .filter(|e| {
                let len = e.text.chars().count();
                e.confidence >= quality.entity_min_confidence
                    && e.importance >= quality.entity_min_importance
                    && len >= quality.entity_min_len
                    && len <= quality.entity_max_len
                    && !is_random_word(&e.text)
            })
            .take(quality.max_entities_per_source)
            .collect()
    }

    fn quality_relationships(
        &self,
        relationships: Vec<ExtractedRelationship>,
    ) -> Vec<ExtractedRelationship> {
        let quality = &self.config.quality;
        let endpoint_ok = |text: &str| {
            text.chars().count() >= quality.relationship_min_len && !is_random_word(text)
        };

        // a self-referential relationship still uses up one of the per-source slots
        relationships
            .into_iter()
            .filter(|r| {
                r.confidence >= quality.relationship_min_confidence
                    && endpoint_ok(&r.source.text)
                    && endpoint_ok(&r.target.text)
            })
            .take(quality.max_relationships_per_source)
            .filter(|r| entity_id(&r.source.text) != entity_id(&r.target.text))
            .collect()
    }

    fn add_entities<'e>(
        &mut self,
        ctx: &SourceContext,
        entities: &'e [ExtractedEntity],
    ) -> Vec<(String, &'e ExtractedEntity)> {
        let weights = &self.config.weights;
        let mut linked = Vec::with_capacity(entities.len());

        for entity in entities {
            let Some(id) = self.index.get_or_create(entity) else {
                continue;
            };
            if let Some(node) = self.index.node_mut(&id) {
                node.properties.sources.push(ctx.attribution(entity));
            }

            let provenance = EdgeProperties {
                extraction_method: Some(entity.method.clone()),
                ..ctx.edge_properties()
            };

            self.edges.push(
                Edge::new(&ctx.id, &id, RelationType::Contains, entity.confidence)
                    .with_properties(provenance.clone()),
            );
            self.edges.push(
                Edge::new(
                    &ctx.id,
                    &id,
                    RelationType::Informs,
                    entity.confidence * weights.informs_factor,
                )
                .with_properties(provenance),
            );

            if entity.importance > self.config.quality.feature_min_importance {
                self.edges.push(
                    Edge::new(&ctx.id, &id, RelationType::Features, entity.importance)
                        .with_properties(EdgeProperties {
                            importance: Some(entity.importance),
                            ..ctx.edge_properties()
                        }),
                );
            }

            linked.push((id, entity));
        }

        linked
    }

    fn add_relationships(&mut self, ctx: &SourceContext, relationships: &[ExtractedRelationship]) {
        let weights = &self.config.weights;

        for rel in relationships {
            let (Some(from), Some(to)) = (
                self.index.get_or_create(&rel.source.as_entity()),
                self.index.get_or_create(&rel.target.as_entity()),
            ) else {
                continue;
            };

            self.edges.push(
                Edge::new(&from, &to, rel.relation_type, rel.confidence).with_properties(
                    EdgeProperties {
                        extraction_method: Some(PATTERN_METHOD.to_string()),
                        source_type: Some(ctx.provider.clone()),
                        temporal: Some(rel.temporal),
                        context: Some(rel.context.clone()),
                        change: rel.change,
                        ..ctx.edge_properties()
                    },
                ),
            );

            let mention = EdgeProperties {
                relationship_context: Some(rel.relation_type),
                ..ctx.edge_properties()
            };
            for endpoint in [&from, &to] {
                self.edges.push(
                    Edge::new(
                        &ctx.id,
                        endpoint,
                        RelationType::Mentions,
                        weights.mention_strength,
                    )
                    .with_properties(mention.clone()),
                );
            }

            self.edges.push(
                Edge::new(
                    &ctx.id,
                    &from,
                    RelationType::Describes,
                    rel.confidence * weights.describes_factor,
                )
                .with_properties(mention),
            );
        }
    }

    fn link_key_entities(&mut self, linked: &[(String, &ExtractedEntity)]) {
        let quality = &self.config.quality;

        for (id, entity) in linked
            .iter()
            .filter(|(_, e)| {
                e.importance > quality.key_entity_min_importance
                    && e.confidence > quality.key_entity_min_confidence
            })
            .take(quality.max_key_entities_per_source)
        {
            self.edges.push(
                Edge::new(id, &self.event_id, RelationType::Influences, entity.importance)
                    .with_properties(EdgeProperties {
                        importance: Some(entity.importance),
                        ..EdgeProperties::default()
                    }),
            );
        }
    }

    fn finish(self, total_sources: usize) -> Graph {
        let Self {
            config,
            event_id,
            index,
            mut edges,
        } = self;
        let nodes = index.into_nodes();

        enrich_graph(&nodes, &mut edges, &config.chains);
        let causal_chains = find_causal_chains(&nodes, &edges, &event_id, &config.chains);

        let metadata = GraphMetadata {
            total_sources,
            total_relations: edges.len(),
            entity_count: nodes.iter().filter(|n| n.node_type.is_entity()).count(),
            relationship_types: edges.iter().map(|e| e.relationship).collect(),
            causal_chains,
        };

        info!(
            "Built causal graph: {} nodes, {} edges, {} chains",
            nodes.len(),
            edges.len(),
            metadata.causal_chains.len()
        );

        Graph {
            nodes,
            edges,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CausalityEngine {
        CausalityEngine::default()
    }

    fn causal_source() -> SourceRecord {
        SourceRecord::new(
            "Rates outlook",
            "https://example.com/rates",
            "Rising interest rates causes economic slowdown.",
        )
    }

    fn event() -> EventDescriptor {
        EventDescriptor::new("Will the economy slow down?").with_id("e1")
    }

    #[test]
    fn test_edge_weight_boosts() {
        let engine = engine();

        let plain = SourceRecord::new("t", "u", "x");
        assert!((engine.calculate_edge_weight(&plain) - 0.5).abs() < 1e-9);

        let recent = plain.clone().with_relevance(0.6).with_recent(true);
        assert!((engine.calculate_edge_weight(&recent) - 0.72).abs() < 1e-9);

        let trusted = plain.clone().with_relevance(0.6).with_provider("Airweave");
        assert!((engine.calculate_edge_weight(&trusted) - 0.69).abs() < 1e-9);

        let capped = plain.with_relevance(0.9).with_recent(true).with_provider("Exa AI");
        assert!((engine.calculate_edge_weight(&capped) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_and_source_nodes() {
        let source = causal_source().with_relevance(0.8);
        let graph = engine().build_causal_graph(&[source], &event()).unwrap();

        let event = graph.node("e1").unwrap();
        assert_eq!(event.node_type, NodeType::Event);
        assert!((event.size - 20.0).abs() < f64::EPSILON);
        assert!(matches!(
            event.properties.detail,
            Some(NodeDetail::Event(ref d)) if d.title == "Will the economy slow down?"
        ));

        let source = graph.node("source_0").unwrap();
        assert_eq!(source.label, "Rates outlook");
        assert!((source.size - 8.0).abs() < f64::EPSILON);
        assert_eq!(source.color, "#569cd6");

        let informs = graph
            .edges
            .iter()
            .find(|e| e.connects("source_0", "e1"))
            .unwrap();
        assert_eq!(informs.relationship, RelationType::Informs);
        assert!((informs.strength - 0.8).abs() < 1e-9);
        assert_eq!(informs.properties.relevance, Some(0.8));
    }

    #[test]
    fn test_relationship_edges_and_attribution() {
        let graph = engine().build_causal_graph(&[causal_source()], &event()).unwrap();

        let cause = "entity_rising_interest_rates";
        let effect = "entity_economic_slowdown";
        assert!(graph.has_edge(cause, effect, RelationType::Causes));
        assert!(graph.has_edge("source_0", cause, RelationType::Mentions));
        assert!(graph.has_edge("source_0", effect, RelationType::Mentions));
        assert!(graph.has_edge("source_0", cause, RelationType::Describes));
        assert!(!graph.has_edge("source_0", effect, RelationType::Describes));

        let causes = graph
            .edges
            .iter()
            .find(|e| e.relationship == RelationType::Causes)
            .unwrap();
        assert!((causes.strength - 0.85).abs() < 1e-9);
        assert_eq!(causes.properties.source_idx, Some(0));
        assert_eq!(causes.properties.source_title.as_deref(), Some("Rates outlook"));

        let describes = graph
            .edges
            .iter()
            .find(|e| e.relationship == RelationType::Describes)
            .unwrap();
        assert!((describes.strength - 0.68).abs() < 1e-9);
        assert_eq!(
            describes.properties.relationship_context,
            Some(RelationType::Causes)
        );

        let node = graph.node(cause).unwrap();
        assert_eq!(node.label, "Rising interest rates");
        assert!((node.properties.confidence - 0.6).abs() < 1e-9);
        assert!((node.size - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_entity_edges_and_features() {
        let source = SourceRecord::new(
            "Fed watch",
            "https://example.com/fed",
            "Analysts expect the Federal Reserve will hold rates steady.",
        );
        let graph = engine().build_causal_graph(&[source], &event()).unwrap();

        let fed = "entity_federal_reserve";
        let node = graph.node(fed).unwrap();
        assert_eq!(node.node_type, NodeType::Person);
        assert_eq!(node.properties.sources.len(), 1);
        assert_eq!(node.properties.sources[0].source_title, "Fed watch");
        assert_eq!(node.properties.sources[0].source_type, "Unknown");

        assert!(graph.has_edge("source_0", fed, RelationType::Contains));
        assert!(graph.has_edge("source_0", fed, RelationType::Informs));
        assert!(!graph.has_edge("source_0", fed, RelationType::Features));
        assert!(!graph.has_edge(fed, "e1", RelationType::Influences));

        let informs = graph
            .edges
            .iter()
            .find(|e| e.connects("source_0", fed) && e.relationship == RelationType::Informs)
            .unwrap();
        assert!((informs.strength - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_key_entities_influence_event() {
        let mut config = EngineConfig::default();
        config.quality.key_entity_min_importance = 0.6;
        config.quality.key_entity_min_confidence = 0.6;

        let source = SourceRecord::new(
            "Fed watch",
            "https://example.com/fed",
            "Analysts expect the Federal Reserve will hold rates steady.",
        );
        let graph = CausalityEngine::new(config)
            .build_causal_graph(&[source], &event())
            .unwrap();

        assert!(graph.has_edge("entity_federal_reserve", "e1", RelationType::Influences));
        assert!(graph
            .metadata
            .relationship_types
            .contains(&RelationType::Influences));
    }

    #[test]
    fn test_custom_pipeline() {
        let config = EngineConfig::default();
        let engine = CausalityEngine::default()
            .with_pipeline(ExtractionPipeline::new(&config.extraction));

        let graph = engine.build_causal_graph(&[causal_source()], &event()).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.metadata.entity_count, 0);
    }

    #[test]
    fn test_untitled_event() {
        let untitled = EventDescriptor::new("  ");

        let graph = engine().build_causal_graph(&[], &untitled).unwrap();
        assert_eq!(graph.node("event").unwrap().label, UNTITLED_EVENT);

        let mut config = EngineConfig::default();
        config.strict_validation = true;
        let result = CausalityEngine::new(config).build_causal_graph(&[], &untitled);
        assert!(matches!(result, Err(Error::InvalidEvent(_))));
    }

    #[test]
    fn test_relationship_cap_per_source() {
        let text = "Rising interest rates causes economic slowdown. \
                    Higher energy costs causes consumer pessimism. \
                    Stronger export demand causes factory expansion. \
                    Tighter credit conditions causes housing weakness.";
        let source = SourceRecord::new("Macro", "https://example.com", text);
        let graph = engine().build_causal_graph(&[source], &event()).unwrap();

        let typed = graph
            .edges
            .iter()
            .filter(|e| e.relationship == RelationType::Causes)
            .count();
        assert_eq!(typed, 3);
    }

    #[test]
    fn test_self_loop_counts_against_relationship_cap() {
        let text = "Rising inflation causes rising inflation. \
                    Higher energy costs causes consumer pessimism. \
                    Stronger export demand causes factory expansion. \
                    Tighter credit conditions causes housing weakness.";
        let source = SourceRecord::new("Macro", "https://example.com", text);
        let graph = engine().build_causal_graph(&[source], &event()).unwrap();

        let typed: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.relationship == RelationType::Causes)
            .collect();
        assert_eq!(typed.len(), 2);
        assert!(typed.iter().all(|e| e.source != e.target));
        assert!(!typed.iter().any(|e| e.target == "entity_housing_weakness"));
    }

    #[test]
    fn test_analyze_returns_fallback_without_chains() {
        let analysis = engine().analyze(&[causal_source()], &event()).unwrap();
        assert!(analysis.graph.metadata.causal_chains.is_empty());
        assert_eq!(
            analysis.predictions,
            vec![Prediction::fallback(&EngineConfig::default().prediction)]
        );
    }
}
