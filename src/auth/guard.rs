//! Owner-or-admin access check for user-scoped resources.

/// Outcome of [`authorize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Admins may act on anyone; everyone else only on themselves.
///
/// Must be evaluated before any data access for the request.
pub fn authorize(acting: &str, is_admin: bool, target_owner: &str) -> Access {
    if is_admin || acting == target_owner {
        Access::Allow
    } else {
        Access::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_access_allowed() {
        assert_eq!(authorize("alice", false, "alice"), Access::Allow);
    }

    #[test]
    fn other_user_denied() {
        assert_eq!(authorize("alice", false, "bob"), Access::Deny);
        assert!(!authorize("alice", false, "bob").is_allowed());
    }

    #[test]
    fn admin_allowed_for_anyone() {
        assert_eq!(authorize("alice", true, "bob"), Access::Allow);
        assert_eq!(authorize("alice", true, "alice"), Access::Allow);
    }

    #[test]
    fn comparison_is_exact() {
        assert_eq!(authorize("Alice", false, "alice"), Access::Deny);
        assert_eq!(authorize("alice ", false, "alice"), Access::Deny);
    }
}
