use std::collections::{HashMap, HashSet};

use crate::table::ColumnKey;

/// Site-level feature row with its phosphorylation localization counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedSite {
    /// Full site key
    pub key: ColumnKey,
    /// Number of phosphorylations detected on the peptide
    pub detected: String,
    /// Number of those that were localized
    pub localized: String,
}

impl LocalizedSite {
    /// True when every detected phosphorylation is localized
    pub fn is_fully_localized(&self) -> bool {
        self.detected == self.localized
    }
}

/// Rows to drop: partially localized sites whose key also appears on another row.
///
/// A partially localized row with a unique key is kept, since its localized
/// sites are the only record of that key.
pub fn unlocalized_duplicates(sites: &[Option<LocalizedSite>]) -> HashSet<usize> {
    let mut counts: HashMap<&ColumnKey, usize> = HashMap::new();
    for site in sites.iter().flatten() {
        *counts.entry(&site.key).or_default() += 1;
    }
    sites
        .iter()
        .enumerate()
        .filter_map(|(i, site)| {
            let site = site.as_ref()?;
            let duplicated = counts.get(&site.key).copied().unwrap_or(0) > 1;
            (duplicated && !site.is_fully_localized()).then_some(i)
        })
        .collect()
}
