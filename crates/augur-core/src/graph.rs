use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::relationship::{RelationType, Tense};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Event,
    Source,
    Person,
    Organization,
    Concept,
    Statistic,
    Outcome,
    /// Reserved start type for causal chains; no extractor emits it today.
    Factor,
}

impl NodeType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Source => "Source",
            Self::Person => "Person",
            Self::Organization => "Organization",
            Self::Concept => "Concept",
            Self::Statistic => "Statistic",
            Self::Outcome => "Outcome",
            Self::Factor => "Factor",
        }
    }

    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Person => "#ce9178",
            Self::Organization | Self::Source => "#569cd6",
            Self::Concept => "#b5cea8",
            Self::Event => "#4ec9b0",
            Self::Statistic => "#dcdcaa",
            Self::Outcome => "#c586c0",
            Self::Factor => "#858585",
        }
    }

    /// Extracted entity types, as opposed to the event and source scaffolding.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        !matches!(self, Self::Event | Self::Source)
    }

    #[must_use]
    pub fn starts_chain(&self) -> bool {
        matches!(self, Self::Concept | Self::Factor)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Event" => Ok(Self::Event),
            "Source" => Ok(Self::Source),
            "Person" => Ok(Self::Person),
            "Organization" => Ok(Self::Organization),
            "Concept" => Ok(Self::Concept),
            "Statistic" => Ok(Self::Statistic),
            "Outcome" => Ok(Self::Outcome),
            "Factor" => Ok(Self::Factor),
            _ => Err(crate::Error::InvalidNodeType(s.to_string())),
        }
    }
}

/// Record of one source mentioning an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttribution {
    pub source_id: String,
    pub source_title: String,
    pub source_url: String,
    pub source_type: String,
    pub relevance: f64,
    pub extraction_method: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub title: String,
    pub volume: f64,
    pub liquidity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDetail {
    pub url: String,
    pub relevance: f64,
    pub text: String,
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetail {
    Event(EventDetail),
    Source(SourceDetail),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    pub confidence: f64,
    pub importance: f64,
    /// Deduplication key of entity nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceAttribution>,
    /// Parsed numeric value of statistic nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<NodeDetail>,
}

impl NodeProperties {
    #[must_use]
    pub fn new(confidence: f64, importance: f64) -> Self {
        Self {
            confidence,
            importance,
            normalized: None,
            sources: Vec::new(),
            value: None,
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub size: f64,
    pub color: String,
    pub properties: NodeProperties,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            size: 6.0,
            color: node_type.color().to_string(),
            properties: NodeProperties::new(1.0, 1.0),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: NodeProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// Attribution and provenance recorded on an edge. Only the fields relevant to the
/// edge's relationship are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_idx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    /// Relationship that caused a MENTIONS or DESCRIBES edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_context: Option<RelationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<Tense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Signed percentage change of quantitative relationships
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub transitive: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relationship: RelationType,
    pub strength: f64,
    /// Reserved for decay; equal to `strength` at creation
    pub weight: f64,
    pub properties: EdgeProperties,
}

impl Edge {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: RelationType,
        strength: f64,
    ) -> Self {
        let strength = strength.clamp(0.0, 1.0);
        Self {
            source: source.into(),
            target: target.into(),
            relationship,
            strength,
            weight: strength,
            properties: EdgeProperties::default(),
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: EdgeProperties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

/// A path of causal-type edges from a factor node to the event node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub start: String,
    pub end: String,
    pub path: Vec<String>,
    pub length: usize,
    pub strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub total_sources: usize,
    pub total_relations: usize,
    pub entity_count: usize,
    pub relationship_types: BTreeSet<RelationType>,
    pub causal_chains: Vec<Chain>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: GraphMetadata,
}

impl Graph {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Id-to-node lookup for repeated queries against the same graph.
    #[must_use]
    pub fn node_lookup(&self) -> HashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str, relationship: RelationType) -> bool {
        self.edges
            .iter()
            .any(|e| e.connects(source, target) && e.relationship == relationship)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.node_type.is_entity()).count()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
