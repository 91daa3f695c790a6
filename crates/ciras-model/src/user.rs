//! Session identity

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user acts under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Staff,
    Admin,
}

impl UserRole {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" => Ok(UserRole::Student),
            "staff" => Ok(UserRole::Staff),
            "admin" => Ok(UserRole::Admin),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

/// Whoever is currently logged in
///
/// Not a directory entry: a user exists only for the length of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    /// Meaningful only for staff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl User {
    /// Create a user without a department
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            department: None,
        }
    }

    /// The single administrator account
    #[must_use]
    pub fn admin() -> Self {
        Self::new("admin-1", "System Administrator", UserRole::Admin)
    }

    /// Staff member acting for `department`
    #[must_use]
    pub fn staff(username: &str, department: impl Into<String>) -> Self {
        let department = department.into();
        Self {
            id: format!("staff-{username}"),
            name: format!("Staff - {department}"),
            role: UserRole::Staff,
            department: Some(department),
        }
    }

    /// Student reporting an issue, optionally by name
    #[must_use]
    pub fn student(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Self::new(Self::student_ref(name), name, UserRole::Student),
            None => Self::new(
                format!("student-{}", ulid::Ulid::new()),
                "Anonymous Student",
                UserRole::Student,
            ),
        }
    }

    /// Student reference stored on issues reported under `name`
    #[must_use]
    pub fn student_ref(name: &str) -> String {
        format!("student-{}", name.trim())
    }

    /// Attach a department
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_user_carries_department() {
        let user = User::staff("staff1", "Estates");
        assert_eq!(user.id, "staff-staff1");
        assert_eq!(user.name, "Staff - Estates");
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.department.as_deref(), Some("Estates"));
    }

    #[test]
    fn unnamed_student_is_anonymous_student() {
        let user = User::student(None);
        assert_eq!(user.name, "Anonymous Student");
        assert!(user.id.starts_with("student-"));

        let blank = User::student(Some("   "));
        assert_eq!(blank.name, "Anonymous Student");
    }

    #[test]
    fn named_student_id_matches_student_ref() {
        let user = User::student(Some("Ada"));
        assert_eq!(user.id, User::student_ref("Ada"));
    }

    #[test]
    fn department_is_omitted_when_absent() {
        let json = serde_json::to_string(&User::admin()).unwrap();
        assert!(!json.contains("department"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
