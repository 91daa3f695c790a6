//! Dashboard aggregates
//!
//! All functions are pure over a slice of issues and a reference instant, so
//! the overdue component is evaluated fresh on every call.

use crate::evaluator::is_overdue;
use chrono::{DateTime, NaiveDate, Utc};
use ciras_model::{Category, Issue, IssueStatus, DEPARTMENTS};
use serde::Serialize;
use std::collections::BTreeMap;

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Aggregate counts for one department, or for all issues
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    /// Department filtered on; `None` covers the whole collection
    pub name: Option<String>,
    pub total_issues: usize,
    pub resolved: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Mean hours from creation to resolution; 0 when nothing is resolved
    pub avg_resolution_time: f64,
}

/// Stats over `issues`, restricted to `department` when given
pub fn department_stats<'a, I>(issues: I, department: Option<&str>, now: DateTime<Utc>) -> DepartmentStats
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut total = 0usize;
    let mut resolved = 0usize;
    let mut overdue = 0usize;
    let mut timed = 0usize;
    let mut resolution_millis = 0i64;

    let selected = issues
        .into_iter()
        .filter(|i| department.map_or(true, |d| i.department_assigned.as_deref() == Some(d)));

    for issue in selected {
        total += 1;
        if issue.status == IssueStatus::Resolved {
            resolved += 1;
            if let Some(elapsed) = issue.resolution_time() {
                timed += 1;
                resolution_millis += elapsed.num_milliseconds();
            }
        }
        if is_overdue(issue, now) {
            overdue += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_resolution_time = if timed == 0 {
        0.0
    } else {
        resolution_millis as f64 / timed as f64 / MILLIS_PER_HOUR
    };

    DepartmentStats {
        name: department.map(str::to_string),
        total_issues: total,
        resolved,
        pending: total - resolved,
        overdue,
        avg_resolution_time,
    }
}

/// Stats for every known department that has at least one issue
#[must_use]
pub fn department_overview(issues: &[&Issue], now: DateTime<Utc>) -> Vec<DepartmentStats> {
    DEPARTMENTS
        .iter()
        .map(|d| department_stats(issues.iter().copied(), Some(d), now))
        .filter(|s| s.total_issues > 0)
        .collect()
}

/// Counts per stored status, plus the derived overdue count
///
/// Overdue issues are also counted under their stored status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub submitted: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub overdue: usize,
}

/// Status distribution at `now`
pub fn status_breakdown<'a, I>(issues: I, now: DateTime<Utc>) -> StatusBreakdown
where
    I: IntoIterator<Item = &'a Issue>,
{
    issues.into_iter().fold(StatusBreakdown::default(), |mut acc, issue| {
        match issue.status {
            IssueStatus::Submitted => acc.submitted += 1,
            IssueStatus::Assigned => acc.assigned += 1,
            IssueStatus::InProgress => acc.in_progress += 1,
            IssueStatus::Resolved => acc.resolved += 1,
        }
        if is_overdue(issue, now) {
            acc.overdue += 1;
        }
        acc
    })
}

/// Issues per category, most frequent first (ties in category order)
pub fn category_breakdown<'a, I>(issues: I) -> Vec<(Category, usize)>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.category).or_default() += 1;
    }
    let mut out: Vec<_> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// The `limit` most reported locations (ties alphabetical)
pub fn location_breakdown<'a, I>(issues: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.location.as_str()).or_default() += 1;
    }
    let mut out: Vec<_> = counts.into_iter().map(|(l, n)| (l.to_string(), n)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out.truncate(limit);
    out
}

/// Issues created per UTC day, oldest day first
pub fn daily_timeline<'a, I>(issues: I) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for issue in issues {
        *counts.entry(issue.created_at.date_naive()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Share of resolved issues as a whole percentage
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resolution_rate<'a, I>(issues: I) -> u32
where
    I: IntoIterator<Item = &'a Issue>,
{
    let (total, resolved) = issues.into_iter().fold((0usize, 0usize), |(t, r), i| {
        (t + 1, r + usize::from(i.status.is_resolved()))
    });
    if total == 0 {
        return 0;
    }
    (resolved as f64 * 100.0 / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;
    use chrono::{Duration, TimeZone};
    use ciras_model::{IssueDraft, User};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
    }

    fn issue(category: Category, location: &str, at: DateTime<Utc>) -> Issue {
        lifecycle::submit(IssueDraft::new(category, location, "x"), None, at)
    }

    fn resolved_after(issue: &Issue, department: &str, hours: i64) -> Issue {
        let admin = User::admin();
        let assigned = lifecycle::assign(issue, department, Default::default(), &admin, issue.created_at);
        lifecycle::change_status(
            &assigned,
            IssueStatus::Resolved,
            &admin,
            issue.created_at + Duration::hours(hours),
        )
    }

    #[test]
    fn test_empty_department_has_zero_average() {
        let stats = department_stats(std::iter::empty(), Some("Estates"), t0());
        assert_eq!(stats.total_issues, 0);
        assert_eq!(stats.avg_resolution_time, 0.0);
        assert!(!stats.avg_resolution_time.is_nan());
    }

    #[test]
    fn test_unresolved_department_has_zero_average() {
        let admin = User::admin();
        let open = lifecycle::assign(
            &issue(Category::WaterSanitation, "Block A", t0()),
            "Estates",
            Default::default(),
            &admin,
            t0(),
        );
        let stats = department_stats([&open], Some("Estates"), t0());
        assert_eq!(stats.total_issues, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.avg_resolution_time, 0.0);
    }

    #[test]
    fn test_average_resolution_in_hours() {
        let a = resolved_after(&issue(Category::WaterSanitation, "Block A", t0()), "Estates", 2);
        let b = resolved_after(&issue(Category::WaterSanitation, "Block B", t0()), "Estates", 4);
        let other = resolved_after(&issue(Category::FeesFinance, "Bursary", t0()), "Finance", 100);

        let stats = department_stats([&a, &b, &other], Some("Estates"), t0());
        assert_eq!(stats.total_issues, 2);
        assert_eq!(stats.resolved, 2);
        assert!((stats.avg_resolution_time - 3.0).abs() < 1e-9);

        let all = department_stats([&a, &b, &other], None, t0());
        assert_eq!(all.total_issues, 3);
        assert!(all.name.is_none());
    }

    #[test]
    fn test_overview_skips_empty_departments() {
        let a = resolved_after(&issue(Category::WaterSanitation, "Block A", t0()), "Estates", 1);
        let b = resolved_after(&issue(Category::FeesFinance, "Bursary", t0()), "Finance", 1);
        let overview = department_overview(&[&a, &b], t0());
        let names: Vec<_> = overview.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["Estates", "Finance"]);
    }

    #[test]
    fn test_status_breakdown_counts_overdue_separately() {
        let admin = User::admin();
        let late = lifecycle::set_deadline(
            &issue(Category::ElectricalLighting, "Library", t0()),
            t0() - Duration::days(1),
            &admin,
            t0(),
        );
        let fresh = issue(Category::ElectricalLighting, "Library", t0());

        let breakdown = status_breakdown([&late, &fresh], t0());
        assert_eq!(breakdown.submitted, 2);
        assert_eq!(breakdown.overdue, 1);
    }

    #[test]
    fn test_category_and_location_ranking() {
        let issues = [
            issue(Category::TransportParking, "Car park C", t0()),
            issue(Category::BuildingsClassrooms, "Block B", t0()),
            issue(Category::TransportParking, "Car park C", t0()),
            issue(Category::ElectricalLighting, "Block A", t0()),
        ];

        let categories = category_breakdown(issues.iter());
        assert_eq!(categories[0], (Category::TransportParking, 2));
        // ties follow category order
        assert_eq!(categories[1].0, Category::BuildingsClassrooms);
        assert_eq!(categories[2].0, Category::ElectricalLighting);

        let locations = location_breakdown(issues.iter(), 2);
        assert_eq!(locations, vec![("Car park C".to_string(), 2), ("Block A".to_string(), 1)]);
    }

    #[test]
    fn test_daily_timeline_and_rate() {
        let day_two = t0() + Duration::days(1);
        let issues = [
            issue(Category::OtherGeneral, "Quad", day_two),
            issue(Category::OtherGeneral, "Quad", t0()),
            resolved_after(&issue(Category::OtherGeneral, "Quad", t0()), "General", 1),
        ];

        let timeline = daily_timeline(issues.iter());
        assert_eq!(timeline, vec![(t0().date_naive(), 2), (day_two.date_naive(), 1)]);
        assert_eq!(resolution_rate(issues.iter()), 33);
        assert_eq!(resolution_rate(std::iter::empty()), 0);
    }
}
