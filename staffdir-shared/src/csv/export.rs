/// CSV export pipeline
///
/// Serializes the entire matching account set — same filter and sort as
/// the list query, no pagination — into one in-memory CSV document.
/// Absent optional enums become empty strings, timestamps are RFC 3339,
/// and the password hash is never included.
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::Account;
use crate::repo::{AccountFilter, AccountQuery, AccountRepository, SortSpec};

use super::EXPORT_COLUMNS;

/// Runs the export pipeline against a repository
pub async fn run<R: AccountRepository>(
    repo: &R,
    filter: AccountFilter,
    sort: SortSpec,
) -> DirectoryResult<String> {
    let query = AccountQuery {
        filter,
        sort,
        offset: 0,
        limit: None,
    };
    let (accounts, _) = repo.query(&query).await?;

    write_document(&accounts)
}

/// Serializes accounts into a complete CSV document (header included)
pub fn write_document(accounts: &[Account]) -> DirectoryResult<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;

    for account in accounts {
        writer
            .write_record([
                account.id.to_string().as_str(),
                account.name.as_str(),
                account.email.as_str(),
                account.role.map(|r| r.as_str()).unwrap_or(""),
                account.status.as_str(),
                account.account_role.as_str(),
                account.created_at.to_rfc3339().as_str(),
                account.updated_at.to_rfc3339().as_str(),
            ])
            .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DirectoryError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountRole, AccountStatus, JobRole};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn account(name: &str, email: &str, role: Option<JobRole>) -> Account {
        Account {
            id: Uuid::nil(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role,
            status: AccountStatus::Active,
            account_role: AccountRole::EndUser,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let doc = write_document(&[
            account("Alice", "alice@example.com", Some(JobRole::Manager)),
            account("Bob", "bob@example.com", None),
        ])
        .unwrap();

        let mut lines = doc.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,email,role,status,account_role,created_at,updated_at"
        );

        let alice = lines.next().unwrap();
        assert!(alice.contains("alice@example.com"));
        assert!(alice.contains("manager"));
        assert!(alice.contains("2024-06-01T12:00:00+00:00"));

        // absent job role serializes as the empty string
        let bob = lines.next().unwrap();
        assert!(bob.contains(",bob@example.com,,active,"));

        assert!(lines.next().is_none());
    }

    #[test]
    fn test_password_hash_never_exported() {
        let doc = write_document(&[account("Alice", "alice@example.com", None)]).unwrap();
        assert!(!doc.contains("argon2"));
        assert!(!doc.contains("secret"));
    }

    #[test]
    fn test_empty_set_is_header_only() {
        let doc = write_document(&[]).unwrap();
        assert_eq!(
            doc.trim_end(),
            "id,name,email,role,status,account_role,created_at,updated_at"
        );
    }
}
