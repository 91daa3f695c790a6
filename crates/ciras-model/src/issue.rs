//! Issue, comment and activity-log entities
//!
//! Persisted with camelCase field names and ISO-8601 timestamps.

use crate::category::Category;
use crate::ids::{ActivityId, CommentId, IssueId};
use crate::status::IssueStatus;
use crate::trail::Trail;
use crate::user::{User, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reported campus issue
///
/// `location` and `description` are fixed at creation; there is no edit
/// operation. Status, assignment and deadline change only through the store,
/// and every such change leaves an entry in `activity_log`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub category: Category,
    pub location: String,
    pub description: String,
    pub status: IssueStatus,
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_assigned: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Set on the first transition to resolved, never cleared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub comments: Trail<Comment>,
    pub activity_log: Trail<ActivityLogEntry>,
}

impl Issue {
    /// Reporter reference safe to show: `None` for anonymous reports
    #[must_use]
    pub fn reporter(&self) -> Option<&str> {
        if self.anonymous {
            None
        } else {
            self.student_id.as_deref()
        }
    }

    /// Copy suitable for public tracking views
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.anonymous {
            copy.student_id = None;
        }
        copy
    }

    /// Whether an admin has routed the issue
    #[inline]
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.department_assigned.is_some()
    }

    /// Time from creation to resolution, if resolved
    #[must_use]
    pub fn resolution_time(&self) -> Option<chrono::Duration> {
        self.resolved_at.map(|at| at - self.created_at)
    }
}

/// Input for creating an issue
///
/// Required fields are expected to be non-empty; validating that is the
/// caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub category: Category,
    pub location: String,
    pub description: String,
    pub anonymous: bool,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl IssueDraft {
    /// Draft with the required fields, not anonymous, no reporter
    #[must_use]
    pub fn new(category: Category, location: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category,
            location: location.into(),
            description: description.into(),
            anonymous: false,
            student_id: None,
            image_url: None,
        }
    }

    /// Mark the report anonymous
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Attach the reporting student
    #[must_use]
    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Attach the reporter given by name
    ///
    /// Anonymous drafts and blank or missing names leave `student_id` unset.
    #[must_use]
    pub fn reported_by(self, name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) if !self.anonymous => self.with_student(User::student_ref(name)),
            _ => self,
        }
    }

    /// Attach an image reference
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// A remark on an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub author_role: UserRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Input for adding a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub author: String,
    pub author_role: UserRole,
    pub content: String,
}

impl CommentDraft {
    /// Comment authored by `user`
    #[must_use]
    pub fn by(user: &User, content: impl Into<String>) -> Self {
        Self {
            author: user.name.clone(),
            author_role: user.role,
            content: content.into(),
        }
    }
}

/// One audit-trail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: ActivityId,
    /// Human-readable description of the mutation
    pub action: String,
    pub actor: String,
    pub actor_role: UserRole,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ActivityLogEntry {
    /// Entry attributed to `actor` at `timestamp`
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        actor: impl Into<String>,
        actor_role: UserRole,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::generate(),
            action: action.into(),
            actor: actor.into(),
            actor_role,
            timestamp,
            details: None,
        }
    }

    /// Attach free-text details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
