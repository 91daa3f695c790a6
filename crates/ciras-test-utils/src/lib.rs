//! Testing utilities for the CIRAS workspace
//!
//! Shared fixtures: drafts, actors, and stores over in-memory storage.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use ciras_model::{Category, IssueDraft, User};
use ciras_store::storage::{MemoryStorage, Storage};
use ciras_store::{AssignmentPolicy, IssueStore, ManualClock, StoreConfig};
use std::sync::Arc;

/// Fixed start instant for clock-driven tests
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn hostel_draft() -> IssueDraft {
    IssueDraft::new(Category::HostelsAccommodation, "Block F", "No water in the showers since Monday")
        .with_student("s1")
}

pub fn anonymous_draft() -> IssueDraft {
    IssueDraft::new(Category::SecurityIncidents, "Car park C", "Gate barrier left open overnight").anonymous()
}

pub fn draft_at(category: Category, location: &str) -> IssueDraft {
    IssueDraft::new(category, location, "Reported during testing")
}

pub fn student() -> User {
    User::student(Some("Ada"))
}

pub fn admin() -> User {
    User::admin()
}

pub fn staff(department: &str) -> User {
    User::staff("staff-test", department)
}

/// Store over fresh in-memory storage and the system clock
pub fn memory_store() -> IssueStore {
    IssueStore::open(Arc::new(MemoryStorage::new()), StoreConfig::new())
}

/// Store whose clock starts at [`epoch`] and only moves when told to
pub struct ClockedStore {
    pub store: IssueStore,
    pub clock: Arc<ManualClock>,
    pub storage: Arc<MemoryStorage>,
}

impl ClockedStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::new())
    }

    pub fn guarded() -> Self {
        Self::with_config(StoreConfig::new().with_assignment_policy(AssignmentPolicy::Guarded))
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(epoch()));
        let store = IssueStore::open_with_clock(
            Arc::clone(&storage) as Arc<dyn Storage>,
            config,
            Arc::clone(&clock) as Arc<dyn ciras_store::Clock>,
        );
        Self { store, clock, storage }
    }

    pub fn advance_hours(&self, hours: i64) {
        self.clock.advance(Duration::hours(hours));
    }
}

impl Default for ClockedStore {
    fn default() -> Self {
        Self::new()
    }
}
