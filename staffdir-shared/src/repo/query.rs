/// Query parameters for the account scan
///
/// The filter is a conjunction of exact enum predicates plus a
/// case-insensitive free-text search over name OR email. Sorting is an
/// explicit whitelist: anything outside it is a validation error at the
/// boundary, never a silent fallback. Pagination is 1-based with a page
/// size capped at 100.
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{AccountRole, AccountStatus, JobRole};

/// Maximum page size for list queries
pub const MAX_PAGE_SIZE: u32 = 100;

/// Conjunctive filter over the account collection
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Exact job role match
    pub role: Option<JobRole>,

    /// Exact status match
    pub status: Option<AccountStatus>,

    /// Exact account role match
    pub account_role: Option<AccountRole>,

    /// Case-insensitive substring over name OR email
    pub search: Option<String>,
}

impl AccountFilter {
    /// Parses raw string parameters into a typed filter
    ///
    /// Each invalid enum value is a field-identified validation error,
    /// mirroring the list operation's contract.
    pub fn from_params(
        role: Option<&str>,
        status: Option<&str>,
        account_role: Option<&str>,
        search: Option<&str>,
    ) -> DirectoryResult<Self> {
        let role = match role.filter(|s| !s.is_empty()) {
            Some(raw) => Some(JobRole::parse(raw).ok_or_else(|| {
                DirectoryError::validation(
                    "role",
                    format!("Invalid role: {raw}. Must be 'manager' or 'developer'"),
                )
            })?),
            None => None,
        };

        let status = match status.filter(|s| !s.is_empty()) {
            Some(raw) => Some(AccountStatus::parse(raw).ok_or_else(|| {
                DirectoryError::validation(
                    "status",
                    format!("Invalid status: {raw}. Must be 'active' or 'inactive'"),
                )
            })?),
            None => None,
        };

        let account_role = match account_role.filter(|s| !s.is_empty()) {
            Some(raw) => Some(AccountRole::parse(raw).ok_or_else(|| {
                DirectoryError::validation(
                    "account_role",
                    format!(
                        "Invalid account_role: {raw}. Must be 'admin', 'corporate_admin', or 'end_user'"
                    ),
                )
            })?),
            None => None,
        };

        Ok(Self {
            role,
            status,
            account_role,
            search: search.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }
}

/// Whitelisted sort attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
    Status,
    Role,
    AccountRole,
}

impl SortField {
    /// Parses a sort field name, `None` for anything off the whitelist
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            "status" => Some(SortField::Status),
            "role" => Some(SortField::Role),
            "account_role" => Some(SortField::AccountRole),
            _ => None,
        }
    }

    /// Column name for the SQL adapter; whitelist-backed so it is safe
    /// to splice into an ORDER BY clause.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Status => "status",
            SortField::Role => "role",
            SortField::AccountRole => "account_role",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A validated sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// Default sort when the caller specifies none: newest first
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Parses raw sort parameters
    ///
    /// An unrecognized sort field or order is a validation error, not a
    /// fallback to the default sort.
    pub fn from_params(field: Option<&str>, order: Option<&str>) -> DirectoryResult<Self> {
        let order = match order.filter(|s| !s.is_empty()) {
            None => SortOrder::Asc,
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(raw) => {
                return Err(DirectoryError::validation(
                    "sort_order",
                    format!("Invalid sort_order: {raw}. Must be 'asc' or 'desc'"),
                ))
            }
        };

        match field.filter(|s| !s.is_empty()) {
            None => Ok(SortSpec::default()),
            Some(raw) => {
                let field = SortField::parse(raw).ok_or_else(|| {
                    DirectoryError::validation(
                        "sort_field",
                        format!("Invalid sort_field: {raw}"),
                    )
                })?;
                Ok(SortSpec { field, order })
            }
        }
    }
}

/// 1-based pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl PageParams {
    /// Validates the page number and size bounds
    pub fn new(page: u32, page_size: u32) -> DirectoryResult<Self> {
        if page < 1 {
            return Err(DirectoryError::validation("page", "Page must be >= 1"));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(DirectoryError::validation(
                "page_size",
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// Row offset for the underlying scan
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_valid_values() {
        let filter = AccountFilter::from_params(
            Some("manager"),
            Some("inactive"),
            Some("corporate_admin"),
            Some("jane"),
        )
        .unwrap();
        assert_eq!(filter.role, Some(JobRole::Manager));
        assert_eq!(filter.status, Some(AccountStatus::Inactive));
        assert_eq!(filter.account_role, Some(AccountRole::CorporateAdmin));
        assert_eq!(filter.search.as_deref(), Some("jane"));
    }

    #[test]
    fn test_filter_rejects_unknown_enum_values() {
        let err = AccountFilter::from_params(Some("intern"), None, None, None).unwrap_err();
        match err {
            DirectoryError::Validation { field, .. } => assert_eq!(field, "role"),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(AccountFilter::from_params(None, Some("frozen"), None, None).is_err());
        assert!(AccountFilter::from_params(None, None, Some("root"), None).is_err());
    }

    #[test]
    fn test_empty_strings_mean_no_filter() {
        let filter = AccountFilter::from_params(Some(""), Some(""), Some(""), Some("")).unwrap();
        assert!(filter.role.is_none());
        assert!(filter.status.is_none());
        assert!(filter.account_role.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_default_sort_is_created_at_desc() {
        let spec = SortSpec::from_params(None, None).unwrap();
        assert_eq!(spec.field, SortField::CreatedAt);
        assert_eq!(spec.order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_field_is_a_validation_error() {
        let err = SortSpec::from_params(Some("bogus"), None).unwrap_err();
        match err {
            DirectoryError::Validation { field, .. } => assert_eq!(field, "sort_field"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_sort_order_parse() {
        let spec = SortSpec::from_params(Some("email"), Some("desc")).unwrap();
        assert_eq!(spec.order, SortOrder::Desc);
        assert!(SortSpec::from_params(Some("email"), Some("descending")).is_err());
    }

    #[test]
    fn test_page_params_bounds() {
        assert!(PageParams::new(0, 10).is_err());
        assert!(PageParams::new(1, 0).is_err());
        assert!(PageParams::new(1, 101).is_err());
        let page = PageParams::new(3, 25).unwrap();
        assert_eq!(page.offset(), 50);
    }
}
