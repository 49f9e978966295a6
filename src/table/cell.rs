use serde::{Deserialize, Serialize};
use std::fmt;

/// Spellings treated as a missing value when reading raw exports
pub const MISSING_TOKENS: &[&str] = &["", "NA", "NaN", "nan", "null", "NULL", "N/A"];

/// A single table value
///
/// Serializes as JSON `null`, a number, or a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value recorded
    #[default]
    Missing,
    /// Numeric measurement
    Number(f64),
    /// Categorical or free-text value
    Text(String),
}

impl Cell {
    /// Parse a raw field, keeping non-numeric text as [`Cell::Text`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_missing_token(trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Cell::Missing,
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Parse a raw field as text only (identifiers, mutation labels).
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_missing_token(trimmed) {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// True for [`Cell::Missing`]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(v)
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::from).unwrap_or(Cell::Missing)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

fn is_missing_token(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}
