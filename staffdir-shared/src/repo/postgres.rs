/// Postgres repository adapter
///
/// Implements [`AccountRepository`] over sqlx. The unique index on
/// `lower(email)` is the final arbiter of email uniqueness: a racing
/// insert or update surfaces as [`RepoError::DuplicateEmail`], detected
/// structurally via the driver's unique-violation classification rather
/// than by matching error text. Every operation is a single statement,
/// so it commits or rolls back atomically on its own.
///
/// Schema lives in `migrations/`; see [`crate::models::account`] for
/// the table definition.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Account, AccountChanges, NewAccount};

use super::{AccountQuery, AccountRepository, RepoError};

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, role, status, account_role, created_at, updated_at";

/// sqlx-backed account repository
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::DuplicateEmail,
        _ => RepoError::Storage(err.to_string()),
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert(&self, data: NewAccount) -> Result<Account, RepoError> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, status, account_role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.status)
        .bind(data.account_role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, RepoError> {
        // Build the SET list from the fields that are present; $1 is
        // always the id.
        let mut sql = String::from("UPDATE accounts SET updated_at = NOW()");
        let mut bind_count = 1;

        if changes.name.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", name = ${bind_count}"));
        }
        if changes.email.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", email = ${bind_count}"));
        }
        if changes.password_hash.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", password_hash = ${bind_count}"));
        }
        if changes.role.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", role = ${bind_count}"));
        }
        if changes.status.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", status = ${bind_count}"));
        }
        if changes.account_role.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", account_role = ${bind_count}"));
        }

        sql.push_str(&format!(" WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Account>(&sql).bind(id);
        if let Some(name) = changes.name {
            q = q.bind(name);
        }
        if let Some(email) = changes.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = changes.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = changes.role {
            q = q.bind(role);
        }
        if let Some(status) = changes.status {
            q = q.bind(status);
        }
        if let Some(account_role) = changes.account_role {
            q = q.bind(account_role);
        }

        q.fetch_optional(&self.pool).await.map_err(map_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, q: &AccountQuery) -> Result<(Vec<Account>, u64), RepoError> {
        let filter = &q.filter;
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_count = 0;

        if filter.role.is_some() {
            bind_count += 1;
            conditions.push(format!("role = ${bind_count}"));
        }
        if filter.status.is_some() {
            bind_count += 1;
            conditions.push(format!("status = ${bind_count}"));
        }
        if filter.account_role.is_some() {
            bind_count += 1;
            conditions.push(format!("account_role = ${bind_count}"));
        }
        if filter.search.is_some() {
            bind_count += 1;
            conditions.push(format!(
                "(name ILIKE ${bind_count} OR email ILIKE ${bind_count})"
            ));
        }

        let where_sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));

        // Total before pagination
        let count_sql = format!("SELECT COUNT(*) FROM accounts{where_sql}");
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        if let Some(role) = filter.role {
            count_query = count_query.bind(role);
        }
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
        }
        if let Some(account_role) = filter.account_role {
            count_query = count_query.bind(account_role);
        }
        if let Some(pattern) = &search_pattern {
            count_query = count_query.bind(pattern.clone());
        }
        let (total,) = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        // Page of rows; sort column and direction come from the typed
        // whitelist, so splicing them is safe.
        let mut select_sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts{where_sql} ORDER BY {} {}",
            q.sort.field.column(),
            q.sort.order.as_sql(),
        );
        if q.limit.is_some() {
            bind_count += 1;
            select_sql.push_str(&format!(" LIMIT ${bind_count}"));
        }
        bind_count += 1;
        select_sql.push_str(&format!(" OFFSET ${bind_count}"));

        let mut select_query = sqlx::query_as::<_, Account>(&select_sql);
        if let Some(role) = filter.role {
            select_query = select_query.bind(role);
        }
        if let Some(status) = filter.status {
            select_query = select_query.bind(status);
        }
        if let Some(account_role) = filter.account_role {
            select_query = select_query.bind(account_role);
        }
        if let Some(pattern) = search_pattern {
            select_query = select_query.bind(pattern);
        }
        if let Some(limit) = q.limit {
            select_query = select_query.bind(limit as i64);
        }
        select_query = select_query.bind(q.offset as i64);

        let items = select_query
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok((items, total as u64))
    }
}
