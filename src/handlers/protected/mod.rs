// handlers/protected/mod.rs - Handlers behind the JWT middleware
//
// Every handler here runs the owner-or-admin guard against the `:username`
// path segment before touching a model.

pub mod activities;
pub mod journal;
pub mod users;

use crate::error::ApiError;

/// Id-addressed routes only serve records that belong to the path's user.
/// A mismatch looks the same as a missing record.
pub(crate) fn ensure_owned(record_owner: &str, path_owner: &str, not_found: String) -> Result<(), ApiError> {
    if record_owner == path_owner {
        Ok(())
    } else {
        Err(ApiError::not_found(not_found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_mismatch_is_not_found() {
        assert!(ensure_owned("u1", "u1", "x".into()).is_ok());
        match ensure_owned("u2", "u1", "No activity history: 3".into()) {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "No activity history: 3"),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
