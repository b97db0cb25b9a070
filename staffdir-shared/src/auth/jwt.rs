/// JWT bearer token issuance and validation
///
/// Tokens are signed with HS256 and carry the account id plus the
/// account role string. The API layer validates the token once per
/// request and hands the embedded role to the directory core — the
/// core itself never parses tokens.
///
/// # Example
///
/// ```
/// use staffdir_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), "admin");
/// let token = create_token(&claims, "a-secret-that-is-long-enough....")?;
///
/// let validated = validate_token(&token, "a-secret-that-is-long-enough....")?;
/// assert_eq!(validated.account_role, "admin");
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer embedded in every claim set
const ISSUER: &str = "staffdir";

/// Access token lifetime
const ACCESS_TOKEN_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the
/// staffdir-specific `account_role` claim the authorizer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account ID
    pub sub: Uuid,

    /// Issuer - always "staffdir"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Resolved account role string (custom claim)
    pub account_role: String,
}

impl Claims {
    /// Creates access-token claims with the default 24h expiration
    pub fn new(account_id: Uuid, account_role: &str) -> Self {
        Self::with_expiration(account_id, account_role, Duration::hours(ACCESS_TOKEN_HOURS))
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(account_id: Uuid, account_role: &str, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            account_role: account_role.to_string(),
        }
    }
}

/// Signs a claim set into a compact JWT
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token's signature, expiration, and issuer
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })
}
