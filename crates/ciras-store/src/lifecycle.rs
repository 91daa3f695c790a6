//! Issue lifecycle rules
//!
//! Pure functions from an issue (or draft) to its next version. Each one that
//! changes status, assignment or deadline appends exactly one activity-log
//! entry; comments go to their own trail and leave the log alone.

use crate::config::AssignmentPolicy;
use chrono::{DateTime, Utc};
use ciras_model::{
    ActivityLogEntry, Comment, CommentDraft, CommentId, Issue, IssueDraft, IssueId, IssueStatus,
    Trail, User, UserRole, ANONYMOUS_ACTOR, UNKNOWN_ACTOR,
};

/// Action recorded for a new issue
pub const SUBMITTED_ACTION: &str = "Issue Submitted";

/// Build a freshly submitted issue from `draft`
///
/// The log actor is "Anonymous" for anonymous drafts, else the submitter's
/// name ("Unknown" without a submitter).
#[must_use]
pub fn submit(draft: IssueDraft, submitter: Option<&User>, at: DateTime<Utc>) -> Issue {
    let actor = if draft.anonymous {
        ANONYMOUS_ACTOR.to_string()
    } else {
        submitter.map_or_else(|| UNKNOWN_ACTOR.to_string(), |u| u.name.clone())
    };
    let actor_role = submitter.map_or(UserRole::Student, |u| u.role);

    Issue {
        id: IssueId::generate(),
        category: draft.category,
        location: draft.location,
        description: draft.description,
        status: IssueStatus::Submitted,
        anonymous: draft.anonymous,
        student_id: draft.student_id,
        department_assigned: None,
        created_at: at,
        deadline: None,
        resolved_at: None,
        image_url: draft.image_url,
        comments: Trail::new(),
        activity_log: Trail::single(ActivityLogEntry::new(SUBMITTED_ACTION, actor, actor_role, at)),
    }
}

/// Move `issue` to `to`
///
/// `resolved_at` is stamped on the first transition to resolved and kept on
/// any later one.
#[must_use]
pub fn change_status(issue: &Issue, to: IssueStatus, actor: &User, at: DateTime<Utc>) -> Issue {
    let from = issue.status;
    let resolved_at = match (to, issue.resolved_at) {
        (IssueStatus::Resolved, None) => Some(at),
        (_, existing) => existing,
    };
    let entry = logged_by(actor, format!("Status changed to {to}"), at).with_details(format!("from {from}"));

    Issue {
        status: to,
        resolved_at,
        activity_log: issue.activity_log.appended(entry),
        ..issue.clone()
    }
}

/// Status an issue ends up with after assignment under `policy`
#[must_use]
pub fn assignment_status(current: IssueStatus, policy: AssignmentPolicy) -> IssueStatus {
    match (policy, current) {
        (AssignmentPolicy::Unconditional, _) | (AssignmentPolicy::Guarded, IssueStatus::Submitted) => {
            IssueStatus::Assigned
        }
        (AssignmentPolicy::Guarded, kept) => kept,
    }
}

/// Route `issue` to `department`
#[must_use]
pub fn assign(
    issue: &Issue,
    department: &str,
    policy: AssignmentPolicy,
    actor: &User,
    at: DateTime<Utc>,
) -> Issue {
    let status = assignment_status(issue.status, policy);
    let mut entry = logged_by(actor, format!("Assigned to {department}"), at);
    if status != IssueStatus::Assigned {
        entry = entry.with_details(format!("status kept as {status}"));
    }

    Issue {
        department_assigned: Some(department.to_string()),
        status,
        activity_log: issue.activity_log.appended(entry),
        ..issue.clone()
    }
}

/// Set or replace the deadline
///
/// No check that the deadline lies in the future or after creation.
#[must_use]
pub fn set_deadline(issue: &Issue, deadline: DateTime<Utc>, actor: &User, at: DateTime<Utc>) -> Issue {
    let entry = logged_by(actor, format!("Deadline set to {}", deadline.format("%Y-%m-%d")), at)
        .with_details(deadline.to_rfc3339());

    Issue {
        deadline: Some(deadline),
        activity_log: issue.activity_log.appended(entry),
        ..issue.clone()
    }
}

/// Append a comment; the activity log is untouched
#[must_use]
pub fn add_comment(issue: &Issue, draft: CommentDraft, at: DateTime<Utc>) -> Issue {
    let comment = Comment {
        id: CommentId::generate(),
        author: draft.author,
        author_role: draft.author_role,
        content: draft.content,
        timestamp: at,
    };

    Issue {
        comments: issue.comments.appended(comment),
        ..issue.clone()
    }
}

fn logged_by(actor: &User, action: String, at: DateTime<Utc>) -> ActivityLogEntry {
    ActivityLogEntry::new(action, actor.name.clone(), actor.role, at)
}
