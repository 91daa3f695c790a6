//! CIRAS domain model
//!
//! Pure data shapes for the campus issue tracker.
//!
//! # Core Concepts
//!
//! - [`Issue`]: a reported problem, moved through [`IssueStatus`] by the store
//! - [`Comment`] and [`ActivityLogEntry`]: the two append-only trails on an issue
//! - [`Trail<T>`]: immutable ordered sequence with a single append operation
//! - [`Category`]: closed set of report categories, each routed to one department
//! - [`User`]: the session identity acting on issues
//!
//! # Example
//!
//! ```rust
//! use ciras_model::{Category, IssueDraft};
//!
//! let draft = IssueDraft::new(Category::HostelsAccommodation, "Block F", "No water")
//!     .with_student("s1");
//! assert_eq!(draft.category.suggested_department(), "Student Affairs");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod category;
mod error;
mod ids;
mod issue;
mod status;
mod trail;
mod user;

pub use category::{Category, DEPARTMENTS};
pub use error::ModelError;
pub use ids::{ActivityId, CommentId, IssueId};
pub use issue::{ActivityLogEntry, Comment, CommentDraft, Issue, IssueDraft};
pub use status::{EffectiveStatus, IssueStatus};
pub use trail::Trail;
pub use user::{User, UserRole};

/// Actor name recorded for anonymous submissions
pub const ANONYMOUS_ACTOR: &str = "Anonymous";

/// Actor name recorded when a submission has no known reporter
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
