/// Errors raised while normalizing sample identifiers
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    /// A normalized identifier does not match the canonical grammar
    #[error(
        "Identifier '{raw}' normalized to non-canonical '{normalized}' by rule set '{rules}'"
    )]
    NonCanonical {
        /// Label as it appeared in the raw file
        raw: String,
        /// Result of applying the rule set
        normalized: String,
        /// Name of the rule set
        rules: String,
    },

    /// A substitution rule has an invalid regular expression
    #[error("Invalid identifier rule pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern text
        pattern: String,
        /// Regex compilation error
        source: regex::Error,
    },
}
