/// API route handlers
///
/// - `health`: liveness and database connectivity check
/// - `auth`: login and token issuance
/// - `accounts`: the account directory surface
pub mod accounts;
pub mod auth;
pub mod health;
