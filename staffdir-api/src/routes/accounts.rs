/// Account directory endpoints
///
/// The full account surface: list with filtering/sorting/pagination,
/// CRUD on single accounts, and the CSV bulk import/export pipelines.
/// All routes sit behind the JWT middleware; role gates are enforced by
/// the directory core, not here.
///
/// # Endpoints
///
/// - `GET    /v1/accounts`             - List accounts
/// - `POST   /v1/accounts`             - Create account (admin)
/// - `GET    /v1/accounts/:id`         - Fetch one account
/// - `PUT    /v1/accounts/:id`         - Update account (field policy)
/// - `DELETE /v1/accounts/:id`         - Delete account (admin)
/// - `POST   /v1/accounts/import-csv`  - Bulk import (admin)
/// - `GET    /v1/accounts/export-csv`  - Full export (admin)
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use staffdir_shared::csv::ImportReport;
use staffdir_shared::directory::{AccountPage, CreateAccount, UpdateAccount};
use staffdir_shared::models::Account;
use staffdir_shared::repo::{AccountFilter, PageParams, SortSpec};
use uuid::Uuid;

use crate::app::{AppState, Caller};
use crate::error::ApiResult;

/// Query parameters for the list and export endpoints
///
/// All parameters are optional strings; parsing and validation happen
/// in the typed layer so unknown enum values and off-whitelist sort
/// fields come back as 422s.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Exact job role filter ("manager" | "developer")
    pub role: Option<String>,

    /// Exact status filter ("active" | "inactive")
    pub status: Option<String>,

    /// Exact account role filter
    pub account_role: Option<String>,

    /// Case-insensitive substring over name or email
    pub search: Option<String>,

    /// Sort attribute (whitelisted)
    pub sort_field: Option<String>,

    /// Sort direction ("asc" | "desc", default asc)
    pub sort_order: Option<String>,

    /// 1-based page number (default 1)
    pub page: Option<u32>,

    /// Page size, 1..=100 (default 10)
    pub page_size: Option<u32>,
}

impl ListQuery {
    fn filter(&self) -> ApiResult<AccountFilter> {
        Ok(AccountFilter::from_params(
            self.role.as_deref(),
            self.status.as_deref(),
            self.account_role.as_deref(),
            self.search.as_deref(),
        )?)
    }

    fn sort(&self) -> ApiResult<SortSpec> {
        Ok(SortSpec::from_params(
            self.sort_field.as_deref(),
            self.sort_order.as_deref(),
        )?)
    }

    fn page_params(&self) -> ApiResult<PageParams> {
        Ok(PageParams::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(10),
        )?)
    }
}

/// List accounts with filtering, sorting, and pagination
///
/// Open to any authenticated caller.
///
/// # Endpoint
///
/// ```text
/// GET /v1/accounts?role=manager&status=active&search=jane&sort_field=name&page=2&page_size=20
/// ```
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> ApiResult<Json<AccountPage>> {
    let page = state
        .directory
        .list(params.filter()?, params.sort()?, params.page_params()?)
        .await?;

    Ok(Json(page))
}

/// Fetch a single account by id
///
/// # Errors
///
/// - `404 Not Found`: No account with that id
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Account>> {
    let account = state.directory.get(id).await?;
    Ok(Json(account))
}

/// Create an account (admin only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_account(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<CreateAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = state.directory.create(req, &caller.role).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update an account under the field write policy
///
/// Admins may change any field; corporate admins only the job role; end
/// users nothing. A request touching any field outside the caller's
/// writable set is rejected wholesale.
///
/// # Errors
///
/// - `403 Forbidden`: Field policy rejected the request
/// - `404 Not Found`: No account with that id
/// - `409 Conflict`: New email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_account(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAccount>,
) -> ApiResult<Json<Account>> {
    let account = state.directory.update(id, req, &caller.role).await?;
    Ok(Json(account))
}

/// Delete an account (admin only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No account with that id
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.directory.delete(id, &caller.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import accounts from a CSV payload (admin only)
///
/// The body is the raw CSV document. Whole-file problems (size,
/// encoding, header schema) are 422s with zero rows processed; row
/// problems are reported per row in the response and never abort the
/// import.
///
/// # Endpoint
///
/// ```text
/// POST /v1/accounts/import-csv
/// Content-Type: text/csv
///
/// name,email,password
/// Jane Doe,jane@example.com,s3cret
/// ```
pub async fn import_csv(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> ApiResult<Json<ImportReport>> {
    let report = state.directory.import_csv(&body, &caller.role).await?;

    tracing::info!(
        total_rows = report.total_rows,
        accounts_created = report.accounts_created,
        failed_rows = report.errors.len(),
        "csv import finished"
    );

    Ok(Json(report))
}

/// Export the full matching account set as CSV (admin only)
///
/// Accepts the same filter and sort parameters as the list endpoint;
/// pagination parameters are ignored since the export is always the
/// complete matching set.
pub async fn export_csv(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListQuery>,
) -> ApiResult<Response> {
    let document = state
        .directory
        .export_csv(params.filter()?, params.sort()?, &caller.role)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"accounts.csv\"",
            ),
        ],
        document,
    )
        .into_response())
}
