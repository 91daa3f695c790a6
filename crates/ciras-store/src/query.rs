//! Issue search filter used by the admin issue table

use ciras_model::{Issue, IssueStatus};

/// Conjunction of optional criteria; the default filter matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Substring of the issue id
    pub id_contains: Option<String>,
    /// Exact assigned department
    pub department: Option<String>,
    /// Exact stored status
    pub status: Option<IssueStatus>,
}

impl IssueFilter {
    /// Match-all filter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With id substring
    #[must_use]
    pub fn id_contains(mut self, fragment: impl Into<String>) -> Self {
        self.id_contains = Some(fragment.into());
        self
    }

    /// With department
    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// With stored status
    #[must_use]
    pub fn status(mut self, status: IssueStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether `issue` satisfies every set criterion
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(fragment) = &self.id_contains {
            if !issue.id.as_str().contains(fragment.as_str()) {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if issue.department_assigned.as_deref() != Some(department.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if issue.status != status {
                return false;
            }
        }
        true
    }
}
