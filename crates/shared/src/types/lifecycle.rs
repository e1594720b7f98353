//! Record lifecycle for soft-deletable entities.
//!
//! Currencies, customers, debts and trade records are never hard-deleted while
//! the treasury journal may point at them. Deletion flips them to
//! [`RecordState::Deleted`]; default queries only return active records.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a soft-deletable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    /// Visible to default queries and usable by new operations.
    #[default]
    Active,
    /// Retained for history only.
    Deleted,
}

impl RecordState {
    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }

    /// Returns true if new operations may reference the record.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            _ => Err(format!("Unknown record state: {s}")),
        }
    }
}
