/// In-memory repository adapter
///
/// A `HashMap` behind a mutex with the same observable semantics as the
/// Postgres adapter: case-insensitive email uniqueness enforced at
/// insert/update, `updated_at` refreshed on mutation, and the full
/// filter/sort/paginate scan. Used by unit and integration tests so the
/// directory core never needs a live database.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Account, AccountChanges, NewAccount};

use super::{AccountQuery, AccountRepository, RepoError, SortField, SortOrder};

/// In-memory account store
#[derive(Debug, Default)]
pub struct MemoryRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts, for test assertions
    pub fn len(&self) -> usize {
        self.accounts.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks the store, surfacing poisoning as a storage error rather
    /// than a panic, matching how the Postgres adapter reports a broken
    /// backend.
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Account>>, RepoError> {
        self.accounts
            .lock()
            .map_err(|_| RepoError::Storage("account store mutex poisoned".to_string()))
    }
}

fn matches_filter(account: &Account, q: &AccountQuery) -> bool {
    let filter = &q.filter;
    if let Some(role) = filter.role {
        if account.role != Some(role) {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if account.status != status {
            return false;
        }
    }
    if let Some(account_role) = filter.account_role {
        if account.account_role != account_role {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_name = account.name.to_lowercase().contains(&needle);
        let in_email = account.email.to_lowercase().contains(&needle);
        if !in_name && !in_email {
            return false;
        }
    }
    true
}

fn compare(a: &Account, b: &Account, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        // absent job roles sort first, then by wire string
        SortField::Role => {
            let left = a.role.map(|r| r.as_str());
            let right = b.role.map(|r| r.as_str());
            left.cmp(&right)
        }
        SortField::AccountRole => a.account_role.as_str().cmp(b.account_role.as_str()),
    }
}

#[async_trait]
impl AccountRepository for MemoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        let accounts = self.guard()?;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        let accounts = self.guard()?;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, data: NewAccount) -> Result<Account, RepoError> {
        let mut accounts = self.guard()?;

        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(RepoError::DuplicateEmail);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            status: data.status,
            account_role: data.account_role,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, RepoError> {
        let mut accounts = self.guard()?;

        if let Some(email) = &changes.email {
            if accounts
                .values()
                .any(|a| a.id != id && a.email.eq_ignore_ascii_case(email))
            {
                return Err(RepoError::DuplicateEmail);
            }
        }

        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            account.name = name;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        if let Some(role) = changes.role {
            account.role = Some(role);
        }
        if let Some(status) = changes.status {
            account.status = status;
        }
        if let Some(account_role) = changes.account_role {
            account.account_role = account_role;
        }
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut accounts = self.guard()?;
        Ok(accounts.remove(&id).is_some())
    }

    async fn query(&self, q: &AccountQuery) -> Result<(Vec<Account>, u64), RepoError> {
        let accounts = self.guard()?;

        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|a| matches_filter(a, q))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        matching.sort_by(|a, b| {
            let ord = compare(a, b, q.sort.field);
            // stable tie-break so pagination never duplicates rows
            let ord = ord.then_with(|| a.id.cmp(&b.id));
            match q.sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let items: Vec<Account> = matching
            .into_iter()
            .skip(q.offset as usize)
            .take(q.limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .collect();

        Ok((items, total))
    }
}
