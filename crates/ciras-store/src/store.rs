//! Issue store handle
//!
//! Owns the authoritative issue collection. Every mutation:
//! 1. computes the next version of one issue via [`lifecycle`](crate::lifecycle)
//! 2. swaps it into a new collection (other slots keep their `Arc`s, order kept)
//! 3. writes the whole collection to storage
//!
//! Storage failures are logged and counted, never returned. A crash before
//! the write lands loses that mutation. Concurrent mutations persist one at a
//! time, in the order their snapshots were taken.

use crate::analytics::{self, DepartmentStats, StatusBreakdown};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::evaluator;
use crate::lifecycle;
use crate::query::IssueFilter;
use crate::storage::Storage;
use chrono::{DateTime, NaiveDate, Utc};
use ciras_model::{Category, CommentDraft, Issue, IssueDraft, IssueId, IssueStatus, User};
use im::Vector;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of the collection, in insertion order
pub type IssueList = Vector<Arc<Issue>>;

/// Stateful issue store
#[derive(Debug)]
pub struct IssueStore {
    config: StoreConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    issues: RwLock<IssueList>,
    /// Held from taking a snapshot until it is written, so writes land in mutation order
    persisting: Mutex<()>,
    persist_failures: AtomicU64,
}

impl IssueStore {
    /// Open the store, rehydrating from `storage`
    ///
    /// A missing record yields an empty store; so does a malformed one, after
    /// logging why.
    pub fn open(storage: Arc<dyn Storage>, config: StoreConfig) -> Self {
        Self::open_with_clock(storage, config, Arc::new(SystemClock))
    }

    /// Open with an explicit time source
    pub fn open_with_clock(storage: Arc<dyn Storage>, config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let issues = load_issues(storage.as_ref(), &config.keys.issues);
        tracing::info!(issues = issues.len(), key = %config.keys.issues, "issue store opened");
        Self {
            config,
            storage,
            clock,
            issues: RwLock::new(issues),
            persisting: Mutex::new(()),
            persist_failures: AtomicU64::new(0),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current instant according to the store's clock
    #[inline]
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Writes to storage that failed since opening
    #[must_use]
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    // ----- mutations -----

    /// Record a new issue submitted by `submitter`
    pub fn add_issue(&self, draft: IssueDraft, submitter: Option<&User>) -> Arc<Issue> {
        let issue = Arc::new(lifecycle::submit(draft, submitter, self.clock.now()));

        let _persisting = self.persisting.lock();
        let snapshot = {
            let mut guard = self.issues.write();
            let mut next = guard.clone();
            next.push_back(Arc::clone(&issue));
            *guard = next;
            guard.clone()
        };

        tracing::info!(
            issue_id = %issue.id,
            category = %issue.category,
            anonymous = issue.anonymous,
            "issue submitted"
        );
        self.persist(&snapshot);
        issue
    }

    /// Change the stored status of an issue
    pub fn update_issue_status(
        &self,
        issue_id: &IssueId,
        status: IssueStatus,
        actor: &User,
    ) -> Result<Arc<Issue>, StoreError> {
        let updated = self.replace(issue_id, |issue, now| {
            lifecycle::change_status(issue, status, actor, now)
        })?;
        tracing::info!(issue_id = %issue_id, status = %status, actor = %actor.name, "issue status changed");
        Ok(updated)
    }

    /// Route an issue to `department`
    ///
    /// The resulting status follows the configured
    /// [`AssignmentPolicy`](crate::config::AssignmentPolicy).
    pub fn assign_issue_to_department(
        &self,
        issue_id: &IssueId,
        department: &str,
        actor: &User,
    ) -> Result<Arc<Issue>, StoreError> {
        let policy = self.config.assignment_policy;
        let updated = self.replace(issue_id, |issue, now| {
            lifecycle::assign(issue, department, policy, actor, now)
        })?;
        tracing::info!(
            issue_id = %issue_id,
            department,
            status = %updated.status,
            actor = %actor.name,
            "issue assigned"
        );
        Ok(updated)
    }

    /// Set the resolution deadline of an issue
    pub fn set_deadline(
        &self,
        issue_id: &IssueId,
        deadline: DateTime<Utc>,
        actor: &User,
    ) -> Result<Arc<Issue>, StoreError> {
        let updated = self.replace(issue_id, |issue, now| {
            lifecycle::set_deadline(issue, deadline, actor, now)
        })?;
        tracing::info!(issue_id = %issue_id, deadline = %deadline, actor = %actor.name, "issue deadline set");
        Ok(updated)
    }

    /// Append a comment to an issue
    pub fn add_comment(&self, issue_id: &IssueId, comment: CommentDraft) -> Result<Arc<Issue>, StoreError> {
        let author = comment.author.clone();
        let updated = self.replace(issue_id, move |issue, now| lifecycle::add_comment(issue, comment, now))?;
        tracing::info!(issue_id = %issue_id, author = %author, "comment added");
        Ok(updated)
    }

    // ----- queries -----

    /// Snapshot of every issue, in insertion order
    #[must_use]
    pub fn issues(&self) -> IssueList {
        self.issues.read().clone()
    }

    /// Number of issues
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.read().len()
    }

    /// Whether no issue has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.read().is_empty()
    }

    /// Look up one issue
    #[must_use]
    pub fn get_issue(&self, issue_id: &IssueId) -> Option<Arc<Issue>> {
        self.issues.read().iter().find(|i| &i.id == issue_id).cloned()
    }

    /// Public tracking view of one issue (reporter hidden when anonymous)
    #[must_use]
    pub fn track_issue(&self, issue_id: &IssueId) -> Option<Issue> {
        self.get_issue(issue_id).map(|i| i.redacted())
    }

    /// Issues reported by `student_id`
    #[must_use]
    pub fn issues_by_student(&self, student_id: &str) -> Vec<Arc<Issue>> {
        self.filtered(|i| i.student_id.as_deref() == Some(student_id))
    }

    /// Issues assigned to `department`
    #[must_use]
    pub fn issues_by_department(&self, department: &str) -> Vec<Arc<Issue>> {
        self.filtered(|i| i.department_assigned.as_deref() == Some(department))
    }

    /// Issues not yet routed to any department
    #[must_use]
    pub fn unassigned_issues(&self) -> Vec<Arc<Issue>> {
        self.filtered(|i| !i.is_assigned())
    }

    /// Issues past their deadline and not resolved, as of now
    #[must_use]
    pub fn overdue_issues(&self) -> Vec<Arc<Issue>> {
        self.overdue_issues_at(self.clock.now())
    }

    /// Issues overdue as of `now`
    #[must_use]
    pub fn overdue_issues_at(&self, now: DateTime<Utc>) -> Vec<Arc<Issue>> {
        self.filtered(|i| evaluator::is_overdue(i, now))
    }

    /// Issues matching `filter`
    #[must_use]
    pub fn search(&self, filter: &IssueFilter) -> Vec<Arc<Issue>> {
        self.filtered(|i| filter.matches(i))
    }

    /// Aggregate stats for `department`, or for everything when `None`
    #[must_use]
    pub fn department_stats(&self, department: Option<&str>) -> DepartmentStats {
        let issues = self.issues();
        analytics::department_stats(issues.iter().map(Arc::as_ref), department, self.clock.now())
    }

    /// Stats for each known department that has issues
    #[must_use]
    pub fn department_overview(&self) -> Vec<DepartmentStats> {
        let issues = self.issues();
        let refs: Vec<&Issue> = issues.iter().map(Arc::as_ref).collect();
        analytics::department_overview(&refs, self.clock.now())
    }

    /// Status distribution as of now
    #[must_use]
    pub fn status_breakdown(&self) -> StatusBreakdown {
        let issues = self.issues();
        analytics::status_breakdown(issues.iter().map(Arc::as_ref), self.clock.now())
    }

    /// Issues per category, most frequent first
    #[must_use]
    pub fn category_breakdown(&self) -> Vec<(Category, usize)> {
        let issues = self.issues();
        analytics::category_breakdown(issues.iter().map(Arc::as_ref))
    }

    /// Most reported locations
    #[must_use]
    pub fn location_breakdown(&self, limit: usize) -> Vec<(String, usize)> {
        let issues = self.issues();
        analytics::location_breakdown(issues.iter().map(Arc::as_ref), limit)
    }

    /// Issues created per day
    #[must_use]
    pub fn daily_timeline(&self) -> Vec<(NaiveDate, usize)> {
        let issues = self.issues();
        analytics::daily_timeline(issues.iter().map(Arc::as_ref))
    }

    /// Percentage of issues resolved
    #[must_use]
    pub fn resolution_rate(&self) -> u32 {
        let issues = self.issues();
        analytics::resolution_rate(issues.iter().map(Arc::as_ref))
    }

    // ----- internals -----

    fn filtered(&self, keep: impl Fn(&Issue) -> bool) -> Vec<Arc<Issue>> {
        self.issues.read().iter().filter(|i| keep(i)).cloned().collect()
    }

    /// Replace one issue in place with `update(old, now)`
    fn replace<F>(&self, issue_id: &IssueId, update: F) -> Result<Arc<Issue>, StoreError>
    where
        F: FnOnce(&Issue, DateTime<Utc>) -> Issue,
    {
        let now = self.clock.now();
        let _persisting = self.persisting.lock();
        let (updated, snapshot) = {
            let mut guard = self.issues.write();
            let Some(index) = guard.iter().position(|i| &i.id == issue_id) else {
                tracing::warn!(issue_id = %issue_id, "mutation on unknown issue ignored");
                return Err(StoreError::IssueNotFound(issue_id.clone()));
            };
            let updated = Arc::new(update(&guard[index], now));
            let mut next = guard.clone();
            next.set(index, Arc::clone(&updated));
            *guard = next;
            (updated, guard.clone())
        };
        self.persist(&snapshot);
        Ok(updated)
    }

    fn persist(&self, snapshot: &IssueList) {
        let key = &self.config.keys.issues;
        let result = encode_issues(snapshot)
            .map_err(StoreError::from)
            .and_then(|text| self.storage.set(key, &text).map_err(StoreError::from));

        if let Err(e) = result {
            self.persist_failures.fetch_add(1, Ordering::Relaxed);
            tracing::error!(key = %key, error = %e, "failed to persist issues");
        }
    }
}

/// Serialize the collection as a JSON array of issues
pub fn encode_issues(issues: &IssueList) -> Result<String, serde_json::Error> {
    let plain: Vec<&Issue> = issues.iter().map(Arc::as_ref).collect();
    serde_json::to_string(&plain)
}

/// Parse a JSON array of issues
pub fn decode_issues(text: &str) -> Result<IssueList, serde_json::Error> {
    let plain: Vec<Issue> = serde_json::from_str(text)?;
    Ok(plain.into_iter().map(Arc::new).collect())
}

fn load_issues(storage: &dyn Storage, key: &str) -> IssueList {
    let text = match storage.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return IssueList::new(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "could not read persisted issues; starting empty");
            return IssueList::new();
        }
    };
    match decode_issues(&text) {
        Ok(issues) => issues,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "persisted issues are malformed; starting empty");
            IssueList::new()
        }
    }
}
