/// Account directory use cases
///
/// [`AccountDirectory`] wires the role authorizer, the field write
/// policy, and the repository port into the operation contracts the
/// transport exposes. It holds no state of its own beyond the
/// repository handle and is safe to share across concurrent requests.
///
/// Authentication is the transport's concern: every caller here is
/// already authenticated, and the directory only consumes the resolved
/// role string. `list` and `get` are open to any authenticated caller;
/// `create`, `delete`, and the CSV pipelines are admin-gated; `update`
/// is gated per field by [`crate::authz::field_policy`].
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password;
use crate::authz::{self, field_policy, ROLE_ADMIN};
use crate::csv::{export, import, ImportReport};
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{Account, AccountChanges, AccountRole, AccountStatus, JobRole, NewAccount};
use crate::repo::{AccountFilter, AccountQuery, AccountRepository, PageParams, SortSpec};
use crate::validate;

/// Input for creating an account
///
/// `password` is the raw secret; it is validated and hashed here and
/// never persisted or logged in raw form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<JobRole>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub account_role: Option<AccountRole>,
}

/// Input for updating an account; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<JobRole>,
    pub status: Option<AccountStatus>,
    pub account_role: Option<AccountRole>,
}

/// One page of list results
#[derive(Debug, Serialize)]
pub struct AccountPage {
    pub items: Vec<Account>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Orchestrator for directory operations
#[derive(Debug, Clone)]
pub struct AccountDirectory<R> {
    repo: R,
}

impl<R: AccountRepository> AccountDirectory<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Direct access to the repository port
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists accounts with filtering, sorting, and pagination
    ///
    /// Open to any authenticated caller. `total` counts all matches
    /// before pagination.
    pub async fn list(
        &self,
        filter: AccountFilter,
        sort: SortSpec,
        page: PageParams,
    ) -> DirectoryResult<AccountPage> {
        let query = AccountQuery {
            filter,
            sort,
            offset: page.offset(),
            limit: Some(u64::from(page.page_size)),
        };
        let (items, total) = self.repo.query(&query).await?;

        Ok(AccountPage {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Fetches a single account by id
    pub async fn get(&self, id: Uuid) -> DirectoryResult<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::NotFound("Account"))
    }

    /// Creates an account; admin only
    ///
    /// Email is re-normalized and re-checked for uniqueness against the
    /// repository immediately before insert — the repository is the
    /// authority, never the caller's claim. The unique constraint still
    /// backs up this pre-check under concurrency.
    pub async fn create(
        &self,
        req: CreateAccount,
        caller_role: &str,
    ) -> DirectoryResult<Account> {
        authz::require_role(caller_role, &[ROLE_ADMIN])?;

        let name = validate::validate_name(&req.name)?;
        let email = validate::normalize_email(&req.email)?;
        validate::validate_password(&req.password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DirectoryError::DuplicateEmail);
        }

        let password_hash = hash_secret(&req.password)?;

        let account = self
            .repo
            .insert(NewAccount {
                name,
                email,
                password_hash,
                role: req.role,
                status: req.status.unwrap_or_default(),
                account_role: req.account_role.unwrap_or_default(),
            })
            .await?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Updates an account under the field write policy
    ///
    /// The policy rejects the whole request when any populated field is
    /// outside the caller's writable set; nothing is partially applied.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateAccount,
        caller_role: &str,
    ) -> DirectoryResult<Account> {
        field_policy::authorize_update(caller_role, &req)?;

        let mut changes = AccountChanges::default();

        if let Some(name) = &req.name {
            changes.name = Some(validate::validate_name(name)?);
        }
        if let Some(email) = &req.email {
            let email = validate::normalize_email(email)?;
            if let Some(existing) = self.repo.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(DirectoryError::DuplicateEmail);
                }
            }
            changes.email = Some(email);
        }
        if let Some(raw) = &req.password {
            validate::validate_password(raw)?;
            changes.password_hash = Some(hash_secret(raw)?);
        }
        changes.role = req.role;
        changes.status = req.status;
        changes.account_role = req.account_role;

        let account = self
            .repo
            .update(id, changes)
            .await?
            .ok_or(DirectoryError::NotFound("Account"))?;

        tracing::info!(account_id = %account.id, "account updated");
        Ok(account)
    }

    /// Deletes an account; admin only
    ///
    /// A missing id is a `NotFound` error, not a silent no-op, so a
    /// second delete of the same id fails.
    pub async fn delete(&self, id: Uuid, caller_role: &str) -> DirectoryResult<()> {
        authz::require_role(caller_role, &[ROLE_ADMIN])?;

        if !self.repo.delete(id).await? {
            return Err(DirectoryError::NotFound("Account"));
        }

        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }

    /// Bulk-creates accounts from a CSV payload; admin only
    ///
    /// Whole-file problems (size, encoding, schema) fail before any row
    /// is processed; row problems fail only that row. See
    /// [`crate::csv::import`].
    pub async fn import_csv(
        &self,
        payload: &[u8],
        caller_role: &str,
    ) -> DirectoryResult<ImportReport> {
        authz::require_role(caller_role, &[ROLE_ADMIN])?;
        import::run(&self.repo, payload).await
    }

    /// Exports the full matching account set as a CSV document; admin only
    pub async fn export_csv(
        &self,
        filter: AccountFilter,
        sort: SortSpec,
        caller_role: &str,
    ) -> DirectoryResult<String> {
        authz::require_role(caller_role, &[ROLE_ADMIN])?;
        export::run(&self.repo, filter, sort).await
    }
}

/// Hashes a raw password, mapping hasher failures to opaque storage
/// errors; the raw value is never included in the error or the logs.
fn hash_secret(raw: &str) -> DirectoryResult<String> {
    password::hash_password(raw).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        DirectoryError::Storage("password hashing failed".to_string())
    })
}
