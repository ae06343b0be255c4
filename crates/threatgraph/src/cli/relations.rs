use std::path::Path;

use anyhow::{Context, Result};

use threatgraph_core::{export, MatchMode, Pipeline};

pub fn run(input: &Path, output: &Path, word_boundary: bool) -> Result<()> {
    let mode = if word_boundary {
        MatchMode::WordBoundary
    } else {
        MatchMode::Substring
    };

    let pipeline = Pipeline::new()
        .context("compiling builtin rules")?
        .with_match_mode(mode);
    let run = pipeline
        .run_path(input)
        .with_context(|| format!("reading corpus from {}", input.display()))?;

    export::write_relations_path(output, &run.triples)
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "Extracted {} relations from {} documents -> {}",
        run.stats.triples,
        run.stats.documents,
        output.display()
    );
    Ok(())
}
