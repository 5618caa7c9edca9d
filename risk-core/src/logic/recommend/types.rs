use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Standard,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Standard => "Standard",
        }
    }
}

/// (exclusive upper rank, priority); ranks past the last band are Standard
pub const PRIORITY_BANDS: &[(usize, Priority)] = &[
    (2, Priority::Critical),
    (4, Priority::High),
    (6, Priority::Medium),
];

/// Priority for a zero-based rank position
pub fn priority_for_rank(rank: usize) -> Priority {
    PRIORITY_BANDS
        .iter()
        .find(|(upper, _)| rank < *upper)
        .map(|(_, p)| *p)
        .unwrap_or(Priority::Standard)
}

/// One recommendation with its presentation priority
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem {
    pub priority: Priority,
    pub feature: String,
    pub text: String,
}
