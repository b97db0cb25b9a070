/// Runtime configuration
///
/// Everything comes from the environment (with `.env` support for
/// local development); there is no config file layer. `DATABASE_URL`
/// and `JWT_SECRET` are required, the rest default to values suited to
/// a local run:
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default 10)
/// - `API_HOST`: bind host (default 0.0.0.0)
/// - `API_PORT`: bind port (default 8080)
/// - `JWT_SECRET`: token signing key, at least 32 bytes (required)
/// - `RUST_LOG`: log filter, consumed by the subscriber in `main`
use std::env;
use std::str::FromStr;

/// Shortest accepted JWT signing key
///
/// Generate one with `openssl rand -hex 32`.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// Server bind settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Database pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Token signing settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing key; never logged
    pub secret: String,
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Fails when a required variable is absent, a numeric variable
    /// does not parse, or the JWT secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long");
        }

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parsed("API_PORT", 8080)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("{key} environment variable is required"))
}

/// Reads an optional variable, parsing it when present
fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        Err(_) => Ok(default),
    }
}
