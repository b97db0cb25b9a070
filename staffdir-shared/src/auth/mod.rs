/// Authentication utilities
///
/// - `password`: Argon2id hashing and verification. The directory core
///   only ever sees the one-way hash; raw passwords are hashed at the
///   boundary and never persisted or logged.
/// - `jwt`: bearer token issuance and validation. Tokens carry the
///   account role so the API layer can resolve a caller role string
///   per request without touching the store.
pub mod jwt;
pub mod password;
