//! # Cross-Table Joins
//!
//! Joins operate on canonical tables and check table roles by
//! [`TableKind`](crate::table::TableKind):
//!
//! - [`join_omics_to_omics`]: omics + omics, inner join on sample
//! - [`join_metadata_to_omics`]: metadata + omics, inner join on sample
//! - [`join_mutations_to_omics`]: per-gene mutation summary for every omics sample
//! - [`join_metadata_to_mutations`]: per-gene mutation summary for every metadata row
//!
//! A wrong table kind is reported as [`JoinError::InvalidTableKind`] naming
//! the valid options; nothing is joined.

mod engine;
mod error;
mod mutation;


pub use engine::{join_metadata_to_omics, join_omics_to_omics};
pub use error::JoinError;
pub use mutation::{
    join_metadata_to_mutations, join_mutations_to_omics, MutationClass, MutationJoinOptions,
    WildtypeConvention, GENE_COLUMN, LOCATION_COLUMN, MUTATION_COLUMN, NO_MUTATION,
    SAMPLE_STATUS_COLUMN,
};
