/// Persistence boundary for accounts
///
/// [`AccountRepository`] is the port the directory core drives; it owns
/// persisted account records exclusively. Two adapters implement it:
///
/// - [`postgres::PgAccountRepository`]: production adapter where the
///   unique index on the normalized email is the final arbiter of
///   uniqueness — application-level pre-checks are advisory and must
///   tolerate losing a race.
/// - [`memory::MemoryRepository`]: in-memory fake with the same
///   semantics, used by tests.
///
/// Uniqueness conflicts are a typed error variant, distinguished
/// structurally by the adapter, never by inspecting error text.
pub mod memory;
pub mod postgres;
pub mod query;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DirectoryError;
use crate::models::{Account, AccountChanges, NewAccount};

pub use query::{AccountFilter, PageParams, SortField, SortOrder, SortSpec, MAX_PAGE_SIZE};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Unique email constraint violated
    #[error("email already registered")]
    DuplicateEmail,

    /// Any other persistence failure
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<RepoError> for DirectoryError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateEmail => DirectoryError::DuplicateEmail,
            RepoError::Storage(detail) => DirectoryError::Storage(detail),
        }
    }
}

/// A filtered, sorted, paginated scan request
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
    /// Conjunctive predicates
    pub filter: AccountFilter,

    /// Validated sort specification
    pub sort: SortSpec,

    /// Rows to skip
    pub offset: u64,

    /// Maximum rows to return; `None` scans the full matching set
    /// (used by CSV export)
    pub limit: Option<u64>,
}

/// Abstract persistence contract for accounts
///
/// Implementations must treat emails as unique case-insensitively on
/// the normalized (trimmed, lowercased) form, and must refresh
/// `updated_at` on every successful mutation.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Looks up an account by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError>;

    /// Looks up an account by normalized email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;

    /// Inserts a new account
    ///
    /// Fails with [`RepoError::DuplicateEmail`] when the email is
    /// already taken, including when a concurrent insert wins the race.
    async fn insert(&self, data: NewAccount) -> Result<Account, RepoError>;

    /// Applies validated changes to an account
    ///
    /// Returns `None` when the account does not exist.
    async fn update(&self, id: Uuid, changes: AccountChanges)
        -> Result<Option<Account>, RepoError>;

    /// Deletes an account; `false` when it did not exist
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Runs a filtered, sorted, paginated scan
    ///
    /// Returns the page of matching accounts plus the total match count
    /// before pagination.
    async fn query(&self, q: &AccountQuery) -> Result<(Vec<Account>, u64), RepoError>;
}
