use std::path::Path;

use crate::corpus::{Corpus, CorpusLoader, LoaderStats};
use crate::entity::EntityMention;
use crate::graph::KnowledgeGraph;
use crate::recognize::EntityRecognizer;
use crate::relation::{MatchMode, RelationExtractor, RelationTriple};
use crate::rules::RuleSet;
use crate::segment::Segmenter;
use crate::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    pub documents: usize,
    pub empty_documents: usize,
    pub mentions: usize,
    pub triples: usize,
    pub nodes: usize,
    pub edges: usize,
    pub duration_ms: u64,
}

pub struct PipelineOutput {
    pub corpus: Corpus,
    pub mentions: Vec<EntityMention>,
    pub triples: Vec<RelationTriple>,
    pub graph: KnowledgeGraph,
    pub stats: PipelineStats,
}

/// Runs the extraction stages in order over one corpus snapshot: load,
/// segment, recognize, normalize, relate, assemble. Single-threaded and
/// synchronous; the corpus read is the only I/O.
pub struct Pipeline {
    rules: RuleSet,
    segmenter: Segmenter,
    mode: MatchMode,
}

impl Pipeline {
    /// Compiles the builtin rule tables. Failure here is a configuration
    /// error and aborts the run before any document is touched.
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::builtin()?,
            segmenter: Segmenter::new()?,
            mode: MatchMode::default(),
        })
    }

    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn run_path(&self, input: &Path) -> Result<PipelineOutput> {
        let corpus = CorpusLoader::load_path(input)?;
        Ok(self.run(corpus))
    }

    pub fn run_str(&self, csv_text: &str) -> Result<PipelineOutput> {
        let corpus = CorpusLoader::load_str(csv_text)?;
        Ok(self.run(corpus))
    }

    #[must_use]
    pub fn run(&self, corpus: Corpus) -> PipelineOutput {
        let start = std::time::Instant::now();

        let recognizer = EntityRecognizer::new(&self.rules, &self.segmenter);
        let mentions = recognizer.recognize_all(&corpus.documents);

        let extractor = RelationExtractor::new(&self.rules, &self.segmenter).with_mode(self.mode);
        let triples = extractor.extract(&corpus.documents, &mentions);

        let graph = KnowledgeGraph::assemble(&mentions, &triples);

        let stats = PipelineStats {
            documents: corpus.stats.rows_read,
            empty_documents: corpus.stats.empty_documents,
            mentions: mentions.len(),
            triples: triples.len(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        tracing::info!(
            documents = stats.documents,
            mentions = stats.mentions,
            triples = stats.triples,
            duration_ms = stats.duration_ms,
            "pipeline complete"
        );

        PipelineOutput {
            corpus,
            mentions,
            triples,
            graph,
            stats,
        }
    }
}

impl PipelineOutput {
    #[must_use]
    pub fn loader_stats(&self) -> LoaderStats {
        self.corpus.stats
    }
}
