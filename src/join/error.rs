use crate::table::{TableError, TableKind};

/// Errors raised by the join engine
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// A table of the wrong kind was passed for a join role
    #[error(
        "{} is not a valid {role} table for this join. Valid options: {}",
        .tables.join(", "),
        .valid.join(", ")
    )]
    InvalidTableKind {
        /// Names of the offending tables
        tables: Vec<String>,
        /// Role the tables were passed for
        role: TableKind,
        /// Table names accepted for that role
        valid: Vec<String>,
    },

    /// A mutation join was requested without any gene
    #[error("No mutation genes requested")]
    NoMutationGenes,

    /// Table lookup or construction failed
    #[error(transparent)]
    Table(#[from] TableError),
}
