/// CSV bulk import/export pipelines
///
/// Wire format: comma-separated, UTF-8, header row required, column
/// names case-insensitive, payloads capped at 5 MiB.
///
/// - `import`: strict schema validation up front, then row-independent
///   validate-and-commit. A bad row never aborts the rows after it.
/// - `export`: the full matching set (same filter/sort as the list
///   query, no pagination) serialized with ISO-8601 timestamps and
///   without the password hash.
pub mod export;
pub mod import;

pub use import::{ImportReport, RowFailure};

/// Maximum accepted import payload
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// Columns every import file must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "email", "password"];

/// Columns an import file may carry
pub const OPTIONAL_COLUMNS: [&str; 3] = ["role", "status", "account_role"];

/// Columns of an export document
pub const EXPORT_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "email",
    "role",
    "status",
    "account_role",
    "created_at",
    "updated_at",
];
