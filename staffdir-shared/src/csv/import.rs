/// CSV bulk-ingestion pipeline
///
/// Single pass over the payload:
///
/// 1. size check (5 MiB cap) — whole file rejected, zero rows processed
/// 2. UTF-8 decode — whole file rejected
/// 3. strict header schema — required columns {name, email, password},
///    optional {role, status, account_role}; empty headers, duplicates,
///    missing required columns, or any column off the allow-list abort
///    the entire import
/// 4. per-row validate-and-insert — rows are numbered from 2 (the
///    header is row 1); each row commits or fails on its own, so a
///    duplicate email inside the file fails the later row only, and a
///    failed row never blocks the rows after it
///
/// The report is the authoritative outcome: the import as a whole is
/// deliberately not transactional.
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{AccountRole, AccountStatus, JobRole, NewAccount};
use crate::repo::{AccountRepository, RepoError};
use crate::validate;

use super::{MAX_IMPORT_BYTES, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

/// Validation failures for one data row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-indexed row number; the header is row 1
    pub row: u64,

    /// Every failure found in the row, not just the first
    pub errors: Vec<String>,
}

/// Outcome summary of a bulk import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Data rows seen, regardless of outcome
    pub total_rows: u64,

    /// Rows that validated and committed
    pub accounts_created: u64,

    /// Per-row failures, in file order
    pub errors: Vec<RowFailure>,
}

/// Runs the import pipeline against a repository
///
/// Whole-file failures return a `Validation` error on the `file` field
/// with zero rows processed; row failures land in the report.
pub async fn run<R: AccountRepository>(
    repo: &R,
    payload: &[u8],
) -> DirectoryResult<ImportReport> {
    if payload.len() > MAX_IMPORT_BYTES {
        return Err(DirectoryError::validation(
            "file",
            "File size exceeds 5MB limit",
        ));
    }

    let text = std::str::from_utf8(payload)
        .map_err(|_| DirectoryError::validation("file", "File is not valid UTF-8"))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DirectoryError::validation("file", format!("Invalid CSV format: {e}")))?
        .clone();

    let columns = validate_columns(&headers)?;

    let mut report = ImportReport {
        total_rows: 0,
        accounts_created: 0,
        errors: Vec::new(),
    };

    for (index, record) in reader.records().enumerate() {
        // data rows are 1-indexed starting at 2; row 1 is the header
        let row = index as u64 + 2;
        report.total_rows += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.errors.push(RowFailure {
                    row,
                    errors: vec![format!("Malformed CSV row: {e}")],
                });
                continue;
            }
        };

        let field = |name: &str| -> &str {
            columns
                .position(name)
                .and_then(|i| record.get(i))
                .unwrap_or("")
        };

        match process_row(
            repo,
            field("name"),
            field("email"),
            field("password"),
            field("role"),
            field("status"),
            field("account_role"),
        )
        .await
        {
            Ok(()) => report.accounts_created += 1,
            Err(errors) => report.errors.push(RowFailure { row, errors }),
        }
    }

    Ok(report)
}

/// Header positions for the allow-listed columns
#[derive(Debug)]
struct ColumnMap {
    positions: Vec<(String, usize)>,
}

impl ColumnMap {
    fn position(&self, name: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, i)| *i)
    }
}

/// Strict header schema validation
///
/// All whole-file header problems are collected and reported together.
fn validate_columns(headers: &::csv::StringRecord) -> DirectoryResult<ColumnMap> {
    let mut errors: Vec<String> = Vec::new();

    let normalized: Vec<(String, usize)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty())
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    if normalized.is_empty() {
        return Err(DirectoryError::validation("file", "CSV file has no headers"));
    }

    let mut duplicates: Vec<&str> = Vec::new();
    for (i, (name, _)) in normalized.iter().enumerate() {
        let repeated = normalized[..i].iter().any(|(prev, _)| prev == name);
        if repeated && !duplicates.contains(&name.as_str()) {
            duplicates.push(name);
        }
    }
    if !duplicates.is_empty() {
        errors.push(format!(
            "Duplicate column headers found: {}",
            duplicates.join(", ")
        ));
    }

    for required in REQUIRED_COLUMNS {
        if !normalized.iter().any(|(name, _)| name == required) {
            errors.push(format!("Missing required column: {required}"));
        }
    }

    let unknown: Vec<&str> = normalized
        .iter()
        .map(|(name, _)| name.as_str())
        .filter(|name| !REQUIRED_COLUMNS.contains(name) && !OPTIONAL_COLUMNS.contains(name))
        .collect();
    if !unknown.is_empty() {
        let mut allowed: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .chain(OPTIONAL_COLUMNS.iter())
            .copied()
            .collect();
        allowed.sort_unstable();
        errors.push(format!(
            "Unknown columns found: {}. Allowed columns: {}",
            unknown.join(", "),
            allowed.join(", ")
        ));
    }

    if !errors.is_empty() {
        return Err(DirectoryError::validation("file", errors.join("; ")));
    }

    Ok(ColumnMap {
        positions: normalized,
    })
}

/// Validates one data row and inserts it when clean
///
/// Returns the full list of failures otherwise; the row contributes
/// zero accounts in that case.
async fn process_row<R: AccountRepository>(
    repo: &R,
    raw_name: &str,
    raw_email: &str,
    raw_password: &str,
    raw_role: &str,
    raw_status: &str,
    raw_account_role: &str,
) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let name = match validate::validate_name(raw_name) {
        Ok(name) => Some(name),
        Err(e) => {
            errors.push(message_of(e));
            None
        }
    };

    let email = match validate::normalize_email(raw_email) {
        Ok(email) => {
            // uniqueness at the time this row is processed: earlier
            // rows in the same file are already visible here
            match repo.find_by_email(&email).await {
                Ok(Some(_)) => {
                    errors.push("Email already registered".to_string());
                    None
                }
                Ok(None) => Some(email),
                Err(e) => {
                    tracing::error!("email uniqueness check failed: {e}");
                    errors.push("Storage error".to_string());
                    None
                }
            }
        }
        Err(e) => {
            errors.push(message_of(e));
            None
        }
    };

    if let Err(e) = validate::validate_password(raw_password) {
        errors.push(message_of(e));
    }

    let role = match parse_optional(raw_role, JobRole::parse) {
        Ok(role) => role,
        Err(raw) => {
            errors.push(format!(
                "Invalid role: {raw}. Must be 'manager' or 'developer'"
            ));
            None
        }
    };

    let status = match parse_optional(raw_status, AccountStatus::parse) {
        Ok(status) => status.unwrap_or_default(),
        Err(raw) => {
            errors.push(format!(
                "Invalid status: {raw}. Must be 'active' or 'inactive'"
            ));
            AccountStatus::default()
        }
    };

    let account_role = match parse_optional(raw_account_role, AccountRole::parse) {
        Ok(account_role) => account_role.unwrap_or_default(),
        Err(raw) => {
            errors.push(format!("Invalid account_role: {raw}"));
            AccountRole::default()
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // both are Some when no error was recorded
    let (name, email) = (name.unwrap(), email.unwrap());

    let password_hash = password::hash_password(raw_password).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        vec!["Storage error".to_string()]
    })?;

    match repo
        .insert(NewAccount {
            name,
            email,
            password_hash,
            role,
            status,
            account_role,
        })
        .await
    {
        Ok(_) => Ok(()),
        // a concurrent writer may win the race after the pre-check
        Err(RepoError::DuplicateEmail) => Err(vec!["Email already registered".to_string()]),
        Err(RepoError::Storage(detail)) => {
            tracing::error!("row insert failed: {detail}");
            Err(vec!["Storage error".to_string()])
        }
    }
}

/// Parses an optional enum cell: empty means absent, anything else must
/// parse. `Err` carries the offending normalized value.
fn parse_optional<T>(raw: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return Ok(None);
    }
    parse(&value).map(Some).ok_or(value)
}

/// Strips the field prefix: row errors are already positional
fn message_of(err: DirectoryError) -> String {
    match err {
        DirectoryError::Validation { message, .. } => message,
        other => other.to_string(),
    }
}
