//! Demo data for an empty installation
//!
//! Seeding happens at most once: it is skipped when issues exist, when demo
//! data was seeded before, or once a real issue has been reported.

use crate::error::StoreError;
use crate::storage::{Storage, DEMO_MARKER_KEY, REAL_ISSUES_MARKER_KEY};
use crate::store::IssueStore;
use ciras_model::{Category, IssueDraft};

/// The demo reports inserted on first run
#[must_use]
pub fn demo_drafts() -> Vec<IssueDraft> {
    vec![
        IssueDraft::new(
            Category::BuildingsClassrooms,
            "Building A, Ground Floor",
            "Broken water fountain in the main hallway. The dispenser is leaking and making a mess.",
        )
        .with_student("demo-student-1"),
        IssueDraft::new(
            Category::ElectricalLighting,
            "Library East Wing, 3rd Floor",
            "Insufficient lighting in study area. Several students reported difficulty reading at night.",
        )
        .anonymous(),
        IssueDraft::new(
            Category::HostelsAccommodation,
            "Hostel B, Building 4",
            "Air conditioning unit not functioning. Room temperature too high for comfortable stay.",
        )
        .with_student("demo-student-2"),
    ]
}

/// Insert the demo issues if the installation qualifies; returns how many
pub fn seed_demo_issues(store: &IssueStore, storage: &dyn Storage) -> Result<usize, StoreError> {
    if !store.is_empty() || storage.contains(DEMO_MARKER_KEY)? || storage.contains(REAL_ISSUES_MARKER_KEY)? {
        tracing::debug!("demo seeding skipped");
        return Ok(0);
    }

    let drafts = demo_drafts();
    let count = drafts.len();
    for draft in drafts {
        store.add_issue(draft, None);
    }
    storage.set(DEMO_MARKER_KEY, "true")?;
    tracing::info!(count, "demo issues seeded");
    Ok(count)
}

/// Record that a real report exists, disabling future demo seeding
pub fn mark_real_issue(storage: &dyn Storage) -> Result<(), StoreError> {
    storage.set(REAL_ISSUES_MARKER_KEY, "true")?;
    Ok(())
}
