use std::collections::{HashMap, HashSet};

use super::extractor::{ExtractedEntity, ExtractedRelationship};
use super::lexicon::{clean_entity, truncate_chars};
use crate::graph::{Node, NodeProperties};
use crate::relationship::RelationType;

pub const ENTITY_ID_PREFIX: &str = "entity_";

const MAX_KEY_LEN: usize = 50;
const MAX_LABEL_LEN: usize = 30;
const BASE_ENTITY_SIZE: f64 = 6.0;

/// Deduplication key: lowercase, punctuation stripped, whitespace runs joined by `_`,
/// capped at 50 characters.
#[must_use]
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let joined = stripped.split_whitespace().collect::<Vec<_>>().join("_");
    truncate_chars(&joined, MAX_KEY_LEN)
}

/// Key of an entity mention after article stripping, so "the Federal Reserve" and
/// "Federal Reserve" share one key.
#[must_use]
pub fn dedup_key(text: &str) -> String {
    normalize(&clean_entity(text))
}

#[must_use]
pub fn entity_id(text: &str) -> String {
    format!("{ENTITY_ID_PREFIX}{}", dedup_key(text))
}

/// Collapses one source's entity mentions by key. The first mention is kept and its
/// scores are raised to the maximum seen for that key.
#[must_use]
pub fn merge_entities(entities: Vec<ExtractedEntity>) -> Vec<ExtractedEntity> {
    let mut merged: Vec<ExtractedEntity> = Vec::with_capacity(entities.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entity in entities {
        let key = dedup_key(&entity.text);

        if let Some(&pos) = positions.get(&key) {
            let existing = &mut merged[pos];
            existing.confidence = existing.confidence.max(entity.confidence);
            existing.importance = existing.importance.max(entity.importance);
        } else {
            positions.insert(key, merged.len());
            merged.push(entity);
        }
    }

    merged
}

/// Drops repeats of the same `(source, relation, target)` triple; first occurrence wins.
#[must_use]
pub fn deduplicate_relationships(
    relationships: Vec<ExtractedRelationship>,
) -> Vec<ExtractedRelationship> {
    let mut seen: HashSet<(String, RelationType, String)> = HashSet::new();

    relationships
        .into_iter()
        .filter(|rel| {
            seen.insert((
                entity_id(&rel.source.text),
                rel.relation_type,
                entity_id(&rel.target.text),
            ))
        })
        .collect()
}

/// Node store for a single graph build.
///
/// Nodes keep insertion order. Entity nodes are keyed by [`entity_id`], and a repeated
/// mention raises the stored confidence and importance to the running maximum.
#[derive(Debug, Default)]
pub struct EntityIndex {
    nodes: Vec<Node>,
    positions: HashMap<String, usize>,
}

impl EntityIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scaffolding node (event or source), replacing any node with the same id.
    pub fn insert_node(&mut self, node: Node) {
        if let Some(&pos) = self.positions.get(&node.id) {
            self.nodes[pos] = node;
        } else {
            self.positions.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }

    /// Resolves an entity mention to its node id, creating the node on first sight.
    ///
    /// Returns `None` when the mention normalizes to an empty key.
    pub fn get_or_create(&mut self, entity: &ExtractedEntity) -> Option<String> {
        let text = clean_entity(&entity.text);
        let key = normalize(&text);
        if key.is_empty() {
            return None;
        }
        let id = format!("{ENTITY_ID_PREFIX}{key}");

        if let Some(node) = self.node_mut(&id) {
            let props = &mut node.properties;
            props.confidence = props.confidence.max(entity.confidence);
            props.importance = props.importance.max(entity.importance);
            if props.value.is_none() {
                props.value = entity.value;
            }
            return Some(id);
        }

        let mut properties = NodeProperties::new(entity.confidence, entity.importance);
        properties.normalized = Some(key);
        properties.value = entity.value;

        let node = Node::new(
            id.clone(),
            truncate_chars(&text, MAX_LABEL_LEN),
            entity.entity_type,
        )
        .with_size(BASE_ENTITY_SIZE + entity.importance * BASE_ENTITY_SIZE)
        .with_properties(properties);

        self.insert_node(node);
        Some(id)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.positions.get(id).map(|&pos| &mut self.nodes[pos])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
