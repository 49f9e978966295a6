use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix marking a matched normal (adjacent tissue) sample
pub const NORMAL_SUFFIX: &str = ".N";

/// Tumor/normal class of a canonical sample identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SampleStatus {
    /// No `.N` suffix
    Tumor,
    /// `.N` suffix
    Normal,
}

impl SampleStatus {
    /// Label used in status columns
    pub fn as_str(self) -> &'static str {
        match self {
            SampleStatus::Tumor => "Tumor",
            SampleStatus::Normal => "Normal",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tumor/normal status, read from the suffix only.
pub fn sample_status(id: &str) -> SampleStatus {
    if id.ends_with(NORMAL_SUFFIX) {
        SampleStatus::Normal
    } else {
        SampleStatus::Tumor
    }
}

/// Patient part of a sample identifier (shared by tumor and normal samples)
pub fn patient_core(id: &str) -> &str {
    id.strip_suffix(NORMAL_SUFFIX).unwrap_or(id)
}

/// Whether `id` matches `^[A-Za-z0-9-]+(\.N)?$`
pub fn is_canonical(id: &str) -> bool {
    let core = patient_core(id);
    !core.is_empty() && core.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
