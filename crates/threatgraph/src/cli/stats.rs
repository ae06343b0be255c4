use std::path::Path;

use anyhow::{Context, Result};

use threatgraph_core::{EntityLabel, Pipeline, StatsReporter};

pub fn run(input: &Path, top: usize) -> Result<()> {
    let pipeline = Pipeline::new().context("compiling builtin rules")?;
    let output = pipeline
        .run_path(input)
        .with_context(|| format!("reading corpus from {}", input.display()))?;

    println!(
        "Corpus: {} documents ({} with empty text)",
        output.stats.documents, output.stats.empty_documents
    );
    println!(
        "Extracted: {} mentions, {} relations, {} nodes, {} edges",
        output.stats.mentions, output.stats.triples, output.stats.nodes, output.stats.edges
    );

    println!("\nMentions by label:");
    for row in StatsReporter::label_counts(&output.mentions) {
        println!("  {:22} {:4}  ({})", row.label.to_string(), row.count, row.label.describe());
    }

    println!("\nMentions by group:");
    for row in StatsReporter::group_counts(&output.mentions) {
        println!("  {:22} {:4}", row.group_name, row.count);
    }

    println!("\nTop {top} entities:");
    for (i, row) in StatsReporter::top_entities(&output.mentions, top)
        .iter()
        .enumerate()
    {
        let labels: Vec<&str> = row.labels.iter().map(|l| l.as_str()).collect();
        println!(
            "  {:2}. {:30} {:4}  [{}]",
            i + 1,
            row.normalized,
            row.count,
            labels.join(", ")
        );
    }

    println!("\nTop {top} per label:");
    for label in EntityLabel::ALL {
        let rows = StatsReporter::top_entities_for_label(&output.mentions, label, top);
        if rows.is_empty() {
            continue;
        }
        println!("  {} ({}):", label, label.describe());
        for row in rows {
            println!("    {:30} {:4}", row.normalized, row.count);
        }
    }

    println!("\nRelations by kind:");
    for row in StatsReporter::relation_counts(&output.triples) {
        println!("  {:22} {:4}", row.relation.to_string(), row.count);
    }

    let hubs = StatsReporter::top_degree_nodes(&output.graph, top.min(5));
    if !hubs.is_empty() {
        println!("\nBest connected nodes:");
        for (id, degree) in hubs {
            println!("  {id:30} degree {degree}");
        }
    }

    Ok(())
}
