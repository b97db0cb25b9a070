//! # Staffdir Shared Library
//!
//! Domain core for the staffdir account directory: role-based
//! authorization, the account query engine, and the CSV bulk
//! import/export pipelines. The HTTP surface lives in `staffdir-api`;
//! this crate is transport-agnostic and only consumes a resolved
//! caller role string per operation.
//!
//! ## Module Organization
//!
//! - `models`: Account entity and its enums
//! - `authz`: Role hierarchy checks and the field-level write policy
//! - `auth`: Password hashing (Argon2id) and JWT issuance/validation
//! - `repo`: `AccountRepository` port with Postgres and in-memory adapters
//! - `directory`: The `AccountDirectory` use-case orchestrator
//! - `csv`: Bulk CSV import/export pipelines
//! - `db`: Connection pool and migration helpers
//! - `error`: The shared error taxonomy

pub mod auth;
pub mod authz;
pub mod csv;
pub mod db;
pub mod directory;
pub mod error;
pub mod models;
pub mod repo;
pub mod validate;

pub use directory::AccountDirectory;
pub use error::{DirectoryError, DirectoryResult};

/// Current version of the staffdir shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
