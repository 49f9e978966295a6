//! # omicsjoin
//!
//! Command-line front end for loading institution exports and joining their tables.
//!
//! ## Usage
//!
//! ```bash
//! # List the tables a dataset loads
//! omicsjoin -v tables --config washu_brca.toml
//!
//! # Transcriptomics with TP53 mutation status
//! omicsjoin join-mutations --config washu_brca.toml --omics transcriptomics --genes TP53 --omics-genes TP53
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
