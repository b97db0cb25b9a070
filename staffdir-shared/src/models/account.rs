/// Account model
///
/// The single managed entity of the directory. Accounts are created
/// directly or through CSV import, mutated via role-gated updates, and
/// hard-deleted. The password hash is carried on the model for
/// credential verification but is never serialized outward.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('admin', 'corporate_admin', 'end_user');
/// CREATE TYPE job_role AS ENUM ('manager', 'developer');
/// CREATE TYPE account_status AS ENUM ('active', 'inactive');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(254) NOT NULL,
///     password_hash VARCHAR(500) NOT NULL,
///     role job_role,
///     status account_status NOT NULL DEFAULT 'active',
///     account_role account_role NOT NULL DEFAULT 'end_user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX accounts_email_key ON accounts (lower(email));
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privilege tier governing hierarchical authorization
///
/// Orthogonal to [`JobRole`]: this is what the account may do, not
/// what the person does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Full control over the directory
    Admin,

    /// May change job roles only
    CorporateAdmin,

    /// Read-only privilege tier
    EndUser,
}

impl AccountRole {
    /// Wire representation, matching the serde/sqlx renames
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::CorporateAdmin => "corporate_admin",
            AccountRole::EndUser => "end_user",
        }
    }

    /// Parses the wire representation, `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(AccountRole::Admin),
            "corporate_admin" => Some(AccountRole::CorporateAdmin),
            "end_user" => Some(AccountRole::EndUser),
            _ => None,
        }
    }
}

impl Default for AccountRole {
    fn default() -> Self {
        AccountRole::EndUser
    }
}

/// Organizational job role, orthogonal to privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobRole {
    Manager,
    Developer,
}

impl JobRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobRole::Manager => "manager",
            JobRole::Developer => "developer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manager" => Some(JobRole::Manager),
            "developer" => Some(JobRole::Developer),
            _ => None,
        }
    }
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            _ => None,
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

/// A directory account
///
/// `email` is stored normalized (trimmed, lowercased) and unique
/// case-insensitively. `status` and `account_role` always hold a
/// concrete value after defaulting.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4), immutable, never reused
    pub id: Uuid,

    /// Display name, 2-100 characters after trimming
    pub name: String,

    /// Normalized email address, unique across all accounts
    pub email: String,

    /// Argon2id password hash, never serialized outward
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional job role (manager, developer)
    pub role: Option<JobRole>,

    /// Lifecycle status, defaults to active
    pub status: AccountStatus,

    /// Privilege tier, defaults to end_user
    pub account_role: AccountRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new account
///
/// Fields are expected to be validated and normalized already; the
/// password arrives hashed. The repository's unique constraint remains
/// the final arbiter on email uniqueness.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<JobRole>,
    pub status: AccountStatus,
    pub account_role: AccountRole,
}

/// Validated field changes for an account update
///
/// Only `Some` fields are applied. `updated_at` is refreshed by the
/// repository whenever any change lands.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<JobRole>,
    pub status: Option<AccountStatus>,
    pub account_role: Option<AccountRole>,
}

impl AccountChanges {
    /// True when no field would be touched
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.status.is_none()
            && self.account_role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips() {
        for role in ["admin", "corporate_admin", "end_user"] {
            assert_eq!(AccountRole::parse(role).unwrap().as_str(), role);
        }
        for role in ["manager", "developer"] {
            assert_eq!(JobRole::parse(role).unwrap().as_str(), role);
        }
        for status in ["active", "inactive"] {
            assert_eq!(AccountStatus::parse(status).unwrap().as_str(), status);
        }
    }

    #[test]
    fn test_unknown_values_do_not_parse() {
        assert!(AccountRole::parse("superadmin").is_none());
        assert!(JobRole::parse("intern").is_none());
        assert!(AccountStatus::parse("suspended").is_none());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AccountRole::default(), AccountRole::EndUser);
        assert_eq!(AccountStatus::default(), AccountStatus::Active);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Test Account".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: None,
            status: AccountStatus::Active,
            account_role: AccountRole::EndUser,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(AccountChanges::default().is_empty());

        let changes = AccountChanges {
            role: Some(JobRole::Manager),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
