/// Error taxonomy for directory operations
///
/// Every use case in [`crate::directory`] returns `DirectoryResult<T>`.
/// The variants map one-to-one onto caller-visible failure classes:
/// validation problems name the offending field, authorization failures
/// are `Forbidden`, duplicate emails are reported the same way whether
/// they were caught by a pre-check or by the storage layer's unique
/// constraint, and storage internals are never leaked outward.
use thiserror::Error;

/// Result alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Unified error type for the directory core
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Malformed or out-of-range input, identified by field
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Caller role lacks authorization for the operation or field
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Email collision, detected pre-check or at commit
    #[error("Email already registered")]
    DuplicateEmail,

    /// Underlying persistence failure not otherwise classified
    ///
    /// The detail is logged internally; callers see an opaque message.
    #[error("storage error")]
    Storage(String),
}

impl DirectoryError {
    /// Builds a field-identified validation error
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Builds a forbidden error with a caller-correctable message
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}
