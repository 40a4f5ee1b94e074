#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::option_if_let_else)]

pub mod causal;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod relationship;
pub mod source;

pub use causal::{Analysis, CausalityEngine, ConfidenceLevel, Prediction};
pub use config::{
    ChainConfig, ConfigError, EngineConfig, ExtractionConfig, PredictionConfig, QualityConfig,
    WeightConfig,
};
pub use error::{Error, Result};
pub use graph::{
    Chain, Edge, EdgeProperties, EventDetail, Graph, GraphMetadata, Node, NodeDetail,
    NodeProperties, NodeType, SourceAttribution, SourceDetail,
};
pub use ingest::{ExtractedEntity, ExtractedRelationship, ExtractionOutput, ExtractionPipeline};
pub use relationship::{RelationCategory, RelationType, Tense};
pub use source::{AnalysisRequest, EventDescriptor, SourceRecord};
