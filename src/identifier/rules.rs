use regex::Regex;
use std::collections::HashMap;

use super::{is_canonical, IdentifierError, NORMAL_SUFFIX};

/// One rewrite step applied to a raw sample label
#[derive(Debug, Clone)]
pub enum Rule {
    /// Regex replace-all
    Replace {
        /// Compiled pattern
        pattern: Regex,
        /// Replacement, may use `$1` style group references
        replacement: String,
    },
    /// Append `.N` unless already present
    MarkNormal,
    /// Exact-match relabeling; unknown labels pass through
    Lookup(HashMap<String, String>),
}

impl Rule {
    /// Compile a replace rule.
    pub fn replace(pattern: &str, replacement: impl Into<String>) -> Result<Self, IdentifierError> {
        let compiled = Regex::new(pattern).map_err(|source| IdentifierError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Rule::Replace {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// Apply this rule to one label.
    pub fn apply(&self, id: &str) -> String {
        match self {
            Rule::Replace {
                pattern,
                replacement,
            } => pattern.replace_all(id, replacement.as_str()).into_owned(),
            Rule::MarkNormal => {
                if id.ends_with(NORMAL_SUFFIX) {
                    id.to_string()
                } else {
                    format!("{}{}", id, NORMAL_SUFFIX)
                }
            }
            Rule::Lookup(map) => map.get(id).cloned().unwrap_or_else(|| id.to_string()),
        }
    }
}

/// Ordered, named list of identifier rules for one labeling convention
///
/// # Example
///
/// ```
/// use omicsjoin::identifier::RuleSet;
///
/// let rules = RuleSet::new("example")
///     .with_replace("_T$", "")
///     .unwrap()
///     .with_replace("_A$", ".N")
///     .unwrap();
/// assert_eq!(rules.normalize("P1_A").unwrap(), "P1.N");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Empty rule set; with no rules it only checks the grammar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Build from `(pattern, replacement)` pairs.
    pub fn from_pairs<P, R>(name: impl Into<String>, pairs: &[(P, R)]) -> Result<Self, IdentifierError>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let mut set = Self::new(name);
        for (pattern, replacement) in pairs {
            set.push(Rule::replace(pattern.as_ref(), replacement.as_ref())?);
        }
        Ok(set)
    }

    /// Append a replace rule.
    pub fn with_replace(mut self, pattern: &str, replacement: &str) -> Result<Self, IdentifierError> {
        self.push(Rule::replace(pattern, replacement)?);
        Ok(self)
    }

    /// Append a mark-normal rule.
    pub fn with_mark_normal(mut self) -> Self {
        self.push(Rule::MarkNormal);
        self
    }

    /// Append a lookup rule.
    pub fn with_lookup(mut self, map: HashMap<String, String>) -> Self {
        self.push(Rule::Lookup(map));
        self
    }

    /// Append a rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Insert a rule before all others
    pub fn prepend(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Append every rule of `other`
    pub fn extend(&mut self, other: &RuleSet) {
        self.rules.extend(other.rules.iter().cloned());
    }

    /// Rule set name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order, without checking the result.
    pub fn apply(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        self.rules
            .iter()
            .fold(trimmed.to_string(), |id, rule| rule.apply(&id))
    }

    /// Apply the rules and check the canonical grammar.
    pub fn normalize(&self, raw: &str) -> Result<String, IdentifierError> {
        let normalized = self.apply(raw);
        if is_canonical(&normalized) {
            Ok(normalized)
        } else {
            Err(IdentifierError::NonCanonical {
                raw: raw.to_string(),
                normalized,
                rules: self.name.clone(),
            })
        }
    }

    /// Normalize a whole index column, failing on the first bad label.
    pub fn normalize_all<I, S>(&self, raw: I) -> Result<Vec<String>, IdentifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|id| self.normalize(id.as_ref())).collect()
    }
}

/// Free function form of [`RuleSet::normalize`]
pub fn normalize(raw: &str, rules: &RuleSet) -> Result<String, IdentifierError> {
    rules.normalize(raw)
}
