//! Derived display status
//!
//! `overdue` is never stored. It is recomputed from `(status, deadline, now)`
//! on every read, so it cannot go stale.

use chrono::{DateTime, Utc};
use ciras_model::{EffectiveStatus, Issue, IssueStatus};

/// Whether an issue with this status and deadline is overdue at `now`
#[inline]
#[must_use]
pub fn is_overdue_at(status: IssueStatus, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match deadline {
        Some(deadline) => deadline < now && !status.is_resolved(),
        None => false,
    }
}

/// Whether `issue` is overdue at `now`
#[inline]
#[must_use]
pub fn is_overdue(issue: &Issue, now: DateTime<Utc>) -> bool {
    is_overdue_at(issue.status, issue.deadline, now)
}

/// Status `issue` should be displayed with at `now`
#[must_use]
pub fn effective_status(issue: &Issue, now: DateTime<Utc>) -> EffectiveStatus {
    if is_overdue(issue, now) {
        EffectiveStatus::Overdue
    } else {
        issue.status.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_deadline_is_never_overdue() {
        for status in IssueStatus::ALL {
            assert!(!is_overdue_at(status, None, now()));
        }
    }

    #[test]
    fn past_deadline_unresolved_is_overdue() {
        let yesterday = now() - Duration::days(1);
        assert!(is_overdue_at(IssueStatus::Assigned, Some(yesterday), now()));
        assert!(is_overdue_at(IssueStatus::InProgress, Some(yesterday), now()));
        assert!(!is_overdue_at(IssueStatus::Resolved, Some(yesterday), now()));
    }

    #[test]
    fn deadline_equal_to_now_is_not_yet_overdue() {
        assert!(!is_overdue_at(IssueStatus::Assigned, Some(now()), now()));
    }

    proptest! {
        #[test]
        fn prop_overdue_matches_rule(
            status_idx in 0usize..4,
            offset_mins in proptest::option::of(-10_000i64..10_000),
        ) {
            let status = IssueStatus::ALL[status_idx];
            let deadline = offset_mins.map(|m| now() + Duration::minutes(m));
            let expected = deadline.is_some_and(|d| d < now()) && status != IssueStatus::Resolved;
            prop_assert_eq!(is_overdue_at(status, deadline, now()), expected);
        }
    }
}
