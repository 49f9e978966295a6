//! # Sample Identifier Normalization
//!
//! Every institution labels its samples differently (`P1_T`, `P1-A`,
//! `P1N`, aliquot barcodes). A [`RuleSet`] rewrites those labels into the
//! canonical form `<PatientCore>` for tumors and `<PatientCore>.N` for
//! matched normals, and rejects anything that still does not fit.

mod error;
mod rules;
mod sample;

#[cfg(test)]
mod tests;

pub use error::IdentifierError;
pub use rules::{normalize, Rule, RuleSet};
pub use sample::{is_canonical, patient_core, sample_status, SampleStatus, NORMAL_SUFFIX};
