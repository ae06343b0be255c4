use std::io::Write;
use std::path::Path;

use crate::entity::EntityMention;
use crate::graph::KnowledgeGraph;
use crate::relation::RelationTriple;
use crate::stats::SummaryRow;
use crate::Result;

/// Entity table: `row_id, entity_text, label, normalized, std_id,
/// context_sentence, source_url, group_name`.
pub fn write_entities<W: Write>(writer: W, mentions: &[EntityMention]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for mention in mentions {
        w.serialize(mention)?;
    }
    w.flush()?;
    Ok(())
}

/// Relation table: `head, relation, tail, evidence`.
pub fn write_relations<W: Write>(writer: W, triples: &[RelationTriple]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for triple in triples {
        w.serialize(triple)?;
    }
    w.flush()?;
    Ok(())
}

/// Summary table: `group_name, label, count`.
pub fn write_summary<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Graph object with `nodes` and `links` sequences, for the renderer.
pub fn write_graph<W: Write>(writer: W, graph: &KnowledgeGraph) -> Result<()> {
    serde_json::to_writer_pretty(writer, graph)?;
    Ok(())
}

pub fn write_entities_path(path: &Path, mentions: &[EntityMention]) -> Result<()> {
    write_entities(std::fs::File::create(path)?, mentions)
}

pub fn write_relations_path(path: &Path, triples: &[RelationTriple]) -> Result<()> {
    write_relations(std::fs::File::create(path)?, triples)
}

pub fn write_summary_path(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    write_summary(std::fs::File::create(path)?, rows)
}

pub fn write_graph_path(path: &Path, graph: &KnowledgeGraph) -> Result<()> {
    write_graph(std::fs::File::create(path)?, graph)
}
