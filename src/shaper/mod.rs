//! # Table Shaping
//!
//! Turns [`RawTable`](crate::raw::RawTable)s into canonical
//! [`Table`](crate::table::Table)s: keyed and sorted columns, samples on the
//! row axis, normalized identifiers.
//!
//! ## Steps
//!
//! 1. Key every feature row (dropping rows the key function rejects)
//! 2. Parse numeric values and sort features by key
//! 3. Transpose so samples become rows
//! 4. Subtract and drop the reference-intensity row, if configured
//! 5. Drop QC and pooled-reference samples
//! 6. Average replicate samples, if configured
//! 7. Normalize sample identifiers and reject duplicates

mod error;
mod phospho;
mod shaper;


pub use error::ShapeError;
pub use phospho::{unlocalized_duplicates, LocalizedSite};
pub use shaper::{concat_disjoint, TableShaper};
