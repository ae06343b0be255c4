pub mod corpus;
pub mod entity;
pub mod error;
pub mod export;
pub mod graph;
pub mod normalize;
pub mod pipeline;
pub mod recognize;
pub mod relation;
pub mod rules;
pub mod segment;
pub mod stats;

pub use corpus::{Corpus, CorpusLoader, DocumentRecord, LoaderStats};
pub use entity::{EntityLabel, EntityMention};
pub use error::{Error, Result};
pub use graph::{GraphEdge, GraphNode, KnowledgeGraph};
pub use normalize::normalize;
pub use pipeline::{Pipeline, PipelineOutput, PipelineStats};
pub use recognize::EntityRecognizer;
pub use relation::{MatchMode, RelationExtractor, RelationKind, RelationTriple};
pub use rules::{EntityRule, RelationRule, RuleSet};
pub use segment::Segmenter;
pub use stats::{
    GroupCount, LabelCount, RelationCount, StatsReporter, SummaryRow, TopEntity,
};
