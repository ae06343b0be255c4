use std::path::Path;

use anyhow::{Context, Result};

use threatgraph_core::{export, Pipeline};

pub fn run(input: &Path, output: &Path) -> Result<()> {
    let pipeline = Pipeline::new().context("compiling builtin rules")?;
    let run = pipeline
        .run_path(input)
        .with_context(|| format!("reading corpus from {}", input.display()))?;

    export::write_entities_path(output, &run.mentions)
        .with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "Extracted {} mentions from {} documents -> {}",
        run.stats.mentions,
        run.stats.documents,
        output.display()
    );
    Ok(())
}
