/// Field-level write authorization for account updates
///
/// Update authorization is scoped to a field subset per caller role,
/// not a binary allow/deny:
///
/// - `admin` may change any field.
/// - `corporate_admin` may change the job role and nothing else. A
///   request carrying any other field alongside the job role, or
///   omitting the job role entirely, is rejected wholesale — partial
///   application would let a semi-privileged caller smuggle other
///   changes next to a legitimate one.
/// - any other role (including unknown strings) may not update at all.
use crate::directory::UpdateAccount;
use crate::error::{DirectoryError, DirectoryResult};

use super::{ROLE_ADMIN, ROLE_CORPORATE_ADMIN};

/// Checks a proposed update against the caller's writable field set
///
/// Returns `Ok(())` when every populated field is writable by the
/// caller role; `Forbidden` otherwise. Never strips fields: the whole
/// request stands or falls together.
pub fn authorize_update(caller_role: &str, update: &UpdateAccount) -> DirectoryResult<()> {
    match caller_role {
        ROLE_ADMIN => Ok(()),
        ROLE_CORPORATE_ADMIN => {
            if update.role.is_none() {
                return Err(DirectoryError::forbidden(
                    "Corporate admin can only update the job role field",
                ));
            }
            if update.name.is_some()
                || update.email.is_some()
                || update.password.is_some()
                || update.status.is_some()
                || update.account_role.is_some()
            {
                return Err(DirectoryError::forbidden(
                    "Corporate admin can only update the job role field",
                ));
            }
            Ok(())
        }
        _ => Err(DirectoryError::forbidden(
            "Insufficient permissions to update account",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountStatus, JobRole};

    fn job_role_only() -> UpdateAccount {
        UpdateAccount {
            role: Some(JobRole::Manager),
            ..Default::default()
        }
    }

    #[test]
    fn test_admin_may_change_anything() {
        let update = UpdateAccount {
            name: Some("New Name".to_string()),
            email: Some("new@example.com".to_string()),
            password: Some("secret".to_string()),
            role: Some(JobRole::Developer),
            status: Some(AccountStatus::Inactive),
            account_role: None,
        };
        assert!(authorize_update("admin", &update).is_ok());
    }

    #[test]
    fn test_corporate_admin_job_role_alone_is_allowed() {
        assert!(authorize_update("corporate_admin", &job_role_only()).is_ok());
    }

    #[test]
    fn test_corporate_admin_extra_field_rejects_whole_request() {
        let update = UpdateAccount {
            role: Some(JobRole::Manager),
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        };
        let err = authorize_update("corporate_admin", &update).unwrap_err();
        assert!(matches!(err, DirectoryError::Forbidden(_)));
    }

    #[test]
    fn test_corporate_admin_without_job_role_is_forbidden() {
        let update = UpdateAccount {
            name: Some("Only A Name".to_string()),
            ..Default::default()
        };
        assert!(authorize_update("corporate_admin", &update).is_err());
        // even an empty update is rejected
        assert!(authorize_update("corporate_admin", &UpdateAccount::default()).is_err());
    }

    #[test]
    fn test_end_user_and_unknown_roles_are_forbidden() {
        assert!(authorize_update("end_user", &job_role_only()).is_err());
        assert!(authorize_update("auditor", &job_role_only()).is_err());
        assert!(authorize_update("", &job_role_only()).is_err());
    }
}
