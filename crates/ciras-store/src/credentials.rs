//! Fixed login table for the admin and departmental staff accounts
//!
//! A plain lookup that turns a username/password pair into a session
//! [`User`]; it is not an access-control mechanism.

use ciras_model::User;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";
const STAFF_PASSWORD: &str = "staff123";

/// Staff usernames and the department each acts for
pub const STAFF_ACCOUNTS: [(&str, &str); 5] = [
    ("staff1", "Estates"),
    ("staff2", "Academic Affairs"),
    ("staff3", "Campus Security"),
    ("staff4", "Student Affairs"),
    ("staff5", "ICT"),
];

/// Resolve a login to a user, or `None` for unknown credentials
#[must_use]
pub fn authenticate(username: &str, password: &str) -> Option<User> {
    if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
        return Some(User::admin());
    }
    if password != STAFF_PASSWORD {
        return None;
    }
    STAFF_ACCOUNTS
        .iter()
        .find(|(name, _)| *name == username)
        .map(|(name, department)| User::staff(name, *department))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciras_model::UserRole;

    #[test]
    fn admin_login() {
        let user = authenticate("admin", "admin123").unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.name, "System Administrator");
        assert!(user.department.is_none());
    }

    #[test]
    fn staff_login_carries_department() {
        let user = authenticate("staff3", "staff123").unwrap();
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.department.as_deref(), Some("Campus Security"));
        assert_eq!(user.id, "staff-staff3");
    }

    #[test]
    fn wrong_password_or_user_is_rejected() {
        assert!(authenticate("admin", "staff123").is_none());
        assert!(authenticate("staff1", "admin123").is_none());
        assert!(authenticate("staff9", "staff123").is_none());
    }
}
