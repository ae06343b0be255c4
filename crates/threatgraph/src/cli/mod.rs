pub mod build;
pub mod entities;
pub mod relations;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "threatgraph",
    about = "Threat-intelligence knowledge-graph builder",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write all four outputs
    Build {
        /// Input corpus CSV (group_name, source_url, description, usage_text)
        input: PathBuf,
        /// Directory for entities.csv, relations.csv, graph.json, summary.csv
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
        /// Require word boundaries when testing entity presence in sentences
        #[arg(long)]
        word_boundary: bool,
    },
    /// Extract entity mentions only
    Entities {
        /// Input corpus CSV
        input: PathBuf,
        /// Output entity table
        #[arg(short, long, default_value = "entities.csv")]
        output: PathBuf,
    },
    /// Extract relation triples
    Relations {
        /// Input corpus CSV
        input: PathBuf,
        /// Output relation table
        #[arg(short, long, default_value = "relations.csv")]
        output: PathBuf,
        /// Require word boundaries when testing entity presence in sentences
        #[arg(long)]
        word_boundary: bool,
    },
    /// Print corpus statistics
    Stats {
        /// Input corpus CSV
        input: PathBuf,
        /// How many top entities to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}
