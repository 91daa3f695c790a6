//! Errors raised when parsing the closed sets of the model

/// Parse failures for categories, statuses and roles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Label is not one of the fixed categories
    #[error("unknown category: '{0}'")]
    UnknownCategory(String),

    /// Not a storable issue status
    #[error("unknown issue status: '{0}'")]
    UnknownStatus(String),

    /// Not one of student, staff or admin
    #[error("unknown user role: '{0}'")]
    UnknownRole(String),
}
