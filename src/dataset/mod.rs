//! # Dataset registry
//!
//! A [`Dataset`] owns the canonical tables of one (source, cancer type)
//! pair. Source specific knowledge lives in [`SourceLoader`]
//! implementations; the dataset drives them through three stages:
//!
//! 1. **Resolve**: a [`FileResolver`] maps a data type key to local files.
//! 2. **Parse**: each file becomes a [`RawTable`](crate::raw::RawTable).
//! 3. **Shape**: the loader turns raw tables into canonical tables.
//!
//! Loading is best effort. A loader that fails is logged and reported in the
//! [`LoadReport`]; the remaining tables are still registered. After loading,
//! the master index is recomputed and metadata tables are reindexed to it.
//!
//! A [`Cohort`] groups datasets of the same cancer type from several sources.

mod cohort;
mod error;
mod loader;
mod registry;
mod resolver;


pub use cohort::Cohort;
pub use error::{DatasetError, LoadError};
pub use loader::{build_lookup, find_part, LoadContext, SourceLoader};
pub use registry::{Dataset, LoadFailure, LoadReport, LoadedTable};
pub use resolver::{FileResolver, LocalResolver, Manifest, LATEST};
