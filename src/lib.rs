//! # omicsjoin - Harmonized Proteogenomics Tables
//!
//! `omicsjoin` loads per-institution exports of cancer proteogenomics studies
//! (proteomics, phosphoproteomics, transcriptomics, clinical, mutations, ...)
//! into sample-indexed tables that share one identifier convention, and joins
//! them across data types.
//!
//! ## Key Features
//!
//! - **Identifier normalization**: Ordered regex rewrite rules turn each
//!   institution's sample labels into `<patient>` for tumors and
//!   `<patient>.N` for normal tissue.
//!
//! - **Composite column keys**: Gene level columns carry a gene symbol plus
//!   database accession; phosphosite columns add the site and peptide.
//!
//! - **Master index**: The union of sample identifiers across a dataset's
//!   tables, tumors first. Metadata tables are reindexed onto it.
//!
//! - **Joins**: Omics to omics, metadata to omics and per-gene mutation
//!   summaries, with missing values filled for samples absent from one side.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use omicsjoin::sources::Source;
//! use omicsjoin::table::ColumnSelection;
//!
//! let mut dataset = Source::Washu.dataset("brca", "latest", "data/washu")?;
//! let report = dataset.load();
//! println!("{}", report.summary());
//!
//! let joined = dataset.join_mutations_to_omics(
//!     "transcriptomics",
//!     &["TP53".to_string()],
//!     &ColumnSelection::from("TP53"),
//!     false,
//!     true,
//! )?;
//! joined.write_tsv(std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`identifier`]: Sample identifier rewrite rules and tumor/normal status
//! - [`raw`]: Delimited (optionally gzip-compressed) raw exports
//! - [`genekey`]: Database accession to gene symbol mapping
//! - [`shaper`]: Raw export to sample-indexed [`table::Table`]
//! - [`harmonize`]: Master index construction and metadata reindexing
//! - [`join`]: Cross-table join engine
//! - [`dataset`]: Per-source table registry, file resolution and loaders
//! - [`sources`]: Institution-specific loaders (BCM, UMich, WashU)

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod dataset;
pub mod genekey;
pub mod harmonize;
pub mod identifier;
pub mod join;
pub mod raw;
pub mod shaper;
pub mod sources;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{Cohort, Dataset, DatasetError, LoadError, LoadReport};
    pub use crate::harmonize::MasterIndex;
    pub use crate::identifier::{normalize, Rule, RuleSet, SampleStatus};
    pub use crate::join::{
        join_metadata_to_mutations, join_metadata_to_omics, join_mutations_to_omics,
        join_omics_to_omics, JoinError, MutationJoinOptions, WildtypeConvention,
    };
    pub use crate::raw::RawTable;
    pub use crate::shaper::TableShaper;
    pub use crate::sources::Source;
    pub use crate::table::{Cell, ColumnKey, ColumnSelection, DataType, Table, TableKind};
}
