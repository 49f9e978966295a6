//! # Index Harmonization
//!
//! After every table of a dataset is loaded, the master sample index is the
//! union of all row identifiers, tumors first then normals, each group in
//! identifier order. The metadata tables are reindexed against it so they
//! hold one row per sample seen anywhere in the dataset.

mod index;


pub use index::{
    reindex_metadata, sort_rows_tumor_first, sort_tumor_first, unionize, HarmonizeError,
    MasterIndex, SAMPLE_STATUS_COLUMN,
};
