//! CIRAS Store - issue lifecycle and state management
//!
//! The state core of the campus issue tracker:
//! - [`IssueStore`]: the issue collection, its mutations and queries
//! - [`evaluator`]: derived overdue status, recomputed on every read
//! - [`SessionProvider`]: the logged-in identity
//! - [`storage`]: durable key-value backends the core persists to
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ciras_model::{Category, IssueDraft, IssueStatus, User};
//! use ciras_store::{IssueStore, StoreConfig, storage::MemoryStorage};
//!
//! let store = IssueStore::open(Arc::new(MemoryStorage::new()), StoreConfig::new());
//! let student = User::student(Some("Ada"));
//! let issue = store.add_issue(
//!     IssueDraft::new(Category::HostelsAccommodation, "Block F", "No hot water").with_student("s1"),
//!     Some(&student),
//! );
//!
//! let admin = User::admin();
//! let assigned = store.assign_issue_to_department(&issue.id, "Student Affairs", &admin).unwrap();
//! assert_eq!(assigned.status, IssueStatus::Assigned);
//! assert_eq!(assigned.activity_log.len(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod analytics;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod evaluator;
pub mod lifecycle;
pub mod query;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;

pub use analytics::{DepartmentStats, StatusBreakdown};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AssignmentPolicy, PersistenceMode, StorageKeys, StoreConfig};
pub use error::{ConfigError, StorageError, StoreError};
pub use evaluator::effective_status;
pub use query::IssueFilter;
pub use session::SessionProvider;
pub use store::{IssueList, IssueStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the store
    pub use crate::{
        AssignmentPolicy, IssueFilter, IssueStore, SessionProvider, StoreConfig, StoreError,
    };
    pub use ciras_model::{
        Category, CommentDraft, EffectiveStatus, Issue, IssueDraft, IssueId, IssueStatus, User,
        UserRole,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
