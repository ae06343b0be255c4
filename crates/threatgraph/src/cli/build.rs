use std::path::Path;

use anyhow::{Context, Result};

use threatgraph_core::{export, MatchMode, Pipeline, StatsReporter};

pub fn run(input: &Path, out_dir: &Path, word_boundary: bool) -> Result<()> {
    let mode = if word_boundary {
        MatchMode::WordBoundary
    } else {
        MatchMode::Substring
    };

    let pipeline = Pipeline::new()
        .context("compiling builtin rules")?
        .with_match_mode(mode);

    let output = pipeline
        .run_path(input)
        .with_context(|| format!("reading corpus from {}", input.display()))?;

    for doc in &output.corpus.documents {
        let mentions = output
            .mentions
            .iter()
            .filter(|m| m.row_id == doc.row_id)
            .count();
        eprintln!("  [{}] {}: {} entities", doc.row_id, doc.group_name, mentions);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    export::write_entities_path(&out_dir.join("entities.csv"), &output.mentions)?;
    export::write_relations_path(&out_dir.join("relations.csv"), &output.triples)?;
    export::write_graph_path(&out_dir.join("graph.json"), &output.graph)?;

    let summary = StatsReporter::group_label_matrix(&output.mentions);
    export::write_summary_path(&out_dir.join("summary.csv"), &summary)?;

    eprintln!(
        "Built graph: {} documents, {} mentions, {} relations, {} nodes, {} edges ({} ms)",
        output.stats.documents,
        output.stats.mentions,
        output.stats.triples,
        output.stats.nodes,
        output.stats.edges,
        output.stats.duration_ms
    );
    eprintln!("Outputs written to {}", out_dir.display());

    Ok(())
}
