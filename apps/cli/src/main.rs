//! Herbarium CLI: turn a plaintext herbal into fine-tuning data.
//!
//! Segments the source into herb entries, chunks them into word windows,
//! and generates instruction/input/output Q&A pairs.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
