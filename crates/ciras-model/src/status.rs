//! Stored issue statuses and the derived display status

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status stored on an issue
///
/// `overdue` is not a stored status: it is derived from the deadline at read
/// time, see [`EffectiveStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Submitted,
    Assigned,
    InProgress,
    Resolved,
}

impl IssueStatus {
    /// All storable statuses, in lifecycle order
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::Submitted,
        IssueStatus::Assigned,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
    ];

    /// Wire name (`in-progress` etc.)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Submitted => "submitted",
            IssueStatus::Assigned => "assigned",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::Resolved => "resolved",
        }
    }

    /// Whether work on the issue is finished
    #[inline]
    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, IssueStatus::Resolved)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// Status an issue is displayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveStatus {
    Submitted,
    Assigned,
    InProgress,
    Resolved,
    Overdue,
}

impl EffectiveStatus {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveStatus::Overdue => "overdue",
            EffectiveStatus::Submitted => IssueStatus::Submitted.as_str(),
            EffectiveStatus::Assigned => IssueStatus::Assigned.as_str(),
            EffectiveStatus::InProgress => IssueStatus::InProgress.as_str(),
            EffectiveStatus::Resolved => IssueStatus::Resolved.as_str(),
        }
    }
}

impl From<IssueStatus> for EffectiveStatus {
    fn from(value: IssueStatus) -> Self {
        match value {
            IssueStatus::Submitted => EffectiveStatus::Submitted,
            IssueStatus::Assigned => EffectiveStatus::Assigned,
            IssueStatus::InProgress => EffectiveStatus::InProgress,
            IssueStatus::Resolved => EffectiveStatus::Resolved,
        }
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
