use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::warn;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use omicsjoin::dataset::{Dataset, LoadReport};
use omicsjoin::table::Table;

mod config;
mod info;
mod join;

pub use config::Config;

/// omicsjoin - Harmonize and join multi-institution proteogenomics tables
#[derive(Parser)]
#[command(name = "omicsjoin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where and how a joined table is written
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the serde JSON form instead of TSV
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    /// Write a table to the configured destination.
    pub fn write(&self, table: &Table) -> Result<()> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                self.write_to(BufWriter::new(file), table)
            }
            None => self.write_to(io::stdout().lock(), table),
        }
    }

    fn write_to<W: Write>(&self, mut writer: W, table: &Table) -> Result<()> {
        if self.json {
            let json = table.to_json().context("Failed to serialize table")?;
            writeln!(writer, "{}", json)?;
        } else {
            table.write_tsv(&mut writer).context("Failed to write table")?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset and list its tables
    Tables {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Print the master sample index with tumor/normal status
    Index {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },

    /// Join two omics tables on their shared samples
    JoinOmics {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Left omics table
        #[arg(long)]
        left: String,

        /// Right omics table
        #[arg(long)]
        right: String,

        /// Comma separated genes from the left table (all when omitted)
        #[arg(long, value_name = "GENES")]
        left_genes: Option<String>,

        /// Comma separated genes from the right table (all when omitted)
        #[arg(long, value_name = "GENES")]
        right_genes: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Join metadata columns to an omics table
    JoinMetadata {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Metadata table (clinical, derived_molecular)
        #[arg(long)]
        metadata: String,

        /// Omics table
        #[arg(long)]
        omics: String,

        /// Comma separated metadata columns (all when omitted)
        #[arg(long, value_name = "COLUMNS")]
        metadata_cols: Option<String>,

        /// Comma separated omics genes (all when omitted)
        #[arg(long, value_name = "GENES")]
        omics_genes: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append per-gene mutation summaries to an omics table
    JoinMutations {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Omics table
        #[arg(long)]
        omics: String,

        /// Comma separated mutation genes
        #[arg(long, value_name = "GENES")]
        genes: String,

        /// Comma separated omics genes (all when omitted)
        #[arg(long, value_name = "GENES")]
        omics_genes: Option<String>,

        /// Keep every mutation per sample and gene instead of the most severe
        #[arg(long)]
        multiple: bool,

        /// Leave out the location columns
        #[arg(long)]
        hide_location: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append per-gene mutation summaries to metadata columns
    JoinMetadataMutations {
        /// Dataset TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Metadata table (clinical, derived_molecular)
        #[arg(long)]
        metadata: String,

        /// Comma separated mutation genes
        #[arg(long, value_name = "GENES")]
        genes: String,

        /// Comma separated metadata columns (all when omitted)
        #[arg(long, value_name = "COLUMNS")]
        metadata_cols: Option<String>,

        /// Keep every mutation per sample and gene instead of the most severe
        #[arg(long)]
        multiple: bool,

        /// Leave out the location columns
        #[arg(long)]
        hide_location: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Build and load the dataset described by a config file.
pub fn load_dataset(config: &Path) -> Result<(Dataset, LoadReport)> {
    let mut dataset = Config::from_file(config)?.build()?;
    let report = dataset.load();
    if !report.is_complete() {
        warn!(
            "{} of {} tables failed to load for {} {}",
            report.failures.len(),
            report.failures.len() + report.loaded.len(),
            dataset.source(),
            dataset.cancer_type()
        );
    }
    Ok((dataset, report))
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Tables { config } => info::run_tables(&config),
        Commands::Index { config } => info::run_index(&config),
        Commands::JoinOmics {
            config,
            left,
            right,
            left_genes,
            right_genes,
            output,
        } => join::run_omics(&config, &left, &right, left_genes.as_deref(), right_genes.as_deref(), &output),
        Commands::JoinMetadata {
            config,
            metadata,
            omics,
            metadata_cols,
            omics_genes,
            output,
        } => join::run_metadata(
            &config,
            &metadata,
            &omics,
            metadata_cols.as_deref(),
            omics_genes.as_deref(),
            &output,
        ),
        Commands::JoinMutations {
            config,
            omics,
            genes,
            omics_genes,
            multiple,
            hide_location,
            output,
        } => join::run_mutations(
            &config,
            &omics,
            &genes,
            omics_genes.as_deref(),
            multiple,
            !hide_location,
            &output,
        ),
        Commands::JoinMetadataMutations {
            config,
            metadata,
            genes,
            metadata_cols,
            multiple,
            hide_location,
            output,
        } => join::run_metadata_mutations(
            &config,
            &metadata,
            &genes,
            metadata_cols.as_deref(),
            multiple,
            !hide_location,
            &output,
        ),
    }
}
