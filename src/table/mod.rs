//! # Canonical Tables
//!
//! The uniform in-memory shape every loader produces: rows keyed by a
//! canonical sample identifier, columns keyed by a [`ColumnKey`].
//!
//! ## Column Keys
//!
//! - `Flat`: a single name (miRNA, clinical attributes, mutation fields)
//! - `Gene`: gene symbol plus database accession
//! - `Site`: gene symbol, site, peptide and database accession
//!
//! Each table carries a [`TableKind`] so the join engine can check roles by
//! pattern match.

mod cell;
mod error;
mod frame;
mod key;
mod kind;
mod selection;


pub use cell::{Cell, MISSING_TOKENS};
pub use error::TableError;
pub use frame::{Table, INDEX_NAME};
pub use key::ColumnKey;
pub use kind::{DataType, TableKind};
pub use selection::{ColumnSelection, SelectedColumn};
