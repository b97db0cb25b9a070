/// Role-hierarchy authorization
///
/// The directory uses a total order over account roles:
/// `admin (3) > corporate_admin (2) > end_user (1)`. A caller satisfies
/// a required-role set when its role literally appears in the set, or
/// when its hierarchy level is at least the lowest level in the set —
/// a higher-ranked role passes any check a lower-ranked role would.
/// Unknown role strings map to level 0 and never dominate anything.
///
/// These checks are pure functions of their inputs: no store access,
/// no shared state, safe to call from concurrent request handlers.
///
/// # Example
///
/// ```
/// use staffdir_shared::authz;
///
/// assert!(authz::has_role("admin", &["corporate_admin"]));
/// assert!(!authz::has_role("end_user", &["admin"]));
/// ```
pub mod field_policy;

use crate::error::{DirectoryError, DirectoryResult};

/// Role string for full directory control
pub const ROLE_ADMIN: &str = "admin";

/// Role string for the job-role-only tier
pub const ROLE_CORPORATE_ADMIN: &str = "corporate_admin";

/// Role string for the lowest privilege tier
pub const ROLE_END_USER: &str = "end_user";

/// Maps a role string to its hierarchy level
///
/// Unknown roles get level 0 so they never dominate a known role.
pub fn hierarchy_level(role: &str) -> u8 {
    match role {
        ROLE_ADMIN => 3,
        ROLE_CORPORATE_ADMIN => 2,
        ROLE_END_USER => 1,
        _ => 0,
    }
}

/// Checks whether a caller role satisfies a required-role set
///
/// True iff the caller role is in `required`, or its hierarchy level is
/// greater than or equal to the minimum level among the required roles.
pub fn has_role(caller_role: &str, required: &[&str]) -> bool {
    if required.contains(&caller_role) {
        return true;
    }

    let caller_level = hierarchy_level(caller_role);
    required
        .iter()
        .any(|role| caller_level >= hierarchy_level(role))
}

/// Variant of [`has_role`] that fails with `Forbidden`
///
/// The message names the required roles so the caller can correct the
/// request.
pub fn require_role(caller_role: &str, required: &[&str]) -> DirectoryResult<()> {
    if has_role(caller_role, required) {
        Ok(())
    } else {
        Err(DirectoryError::forbidden(format!(
            "Access denied. Required roles: {}",
            required.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_levels() {
        assert_eq!(hierarchy_level("admin"), 3);
        assert_eq!(hierarchy_level("corporate_admin"), 2);
        assert_eq!(hierarchy_level("end_user"), 1);
        assert_eq!(hierarchy_level("auditor"), 0);
        assert_eq!(hierarchy_level(""), 0);
    }

    #[test]
    fn test_exact_match_passes() {
        assert!(has_role("end_user", &["end_user"]));
        assert!(has_role("corporate_admin", &["corporate_admin"]));
    }

    #[test]
    fn test_higher_role_dominates_lower() {
        assert!(has_role("admin", &["corporate_admin"]));
        assert!(has_role("admin", &["end_user"]));
        assert!(has_role("corporate_admin", &["end_user"]));
    }

    #[test]
    fn test_lower_role_never_dominates() {
        assert!(!has_role("end_user", &["admin"]));
        assert!(!has_role("end_user", &["corporate_admin"]));
        assert!(!has_role("corporate_admin", &["admin"]));
    }

    #[test]
    fn test_minimum_level_in_set_is_enough() {
        // corporate_admin dominates the weakest member of the set
        assert!(has_role("corporate_admin", &["admin", "end_user"]));
    }

    #[test]
    fn test_unknown_role_is_forbidden() {
        assert!(!has_role("auditor", &["end_user"]));
        assert!(!has_role("", &["end_user"]));
        // unless it literally appears in the required set
        assert!(has_role("auditor", &["auditor"]));
    }

    #[test]
    fn test_require_role_error_names_required_roles() {
        let err = require_role("end_user", &["admin"]).unwrap_err();
        assert!(err.to_string().contains("admin"));
        assert!(require_role("admin", &["admin"]).is_ok());
    }
}
