use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command)
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            input,
            out_dir,
            word_boundary,
        } => cli::build::run(&input, &out_dir, word_boundary),
        Commands::Entities { input, output } => cli::entities::run(&input, &output),
        Commands::Relations {
            input,
            output,
            word_boundary,
        } => cli::relations::run(&input, &output, word_boundary),
        Commands::Stats { input, top } => cli::stats::run(&input, top),
    }
}
