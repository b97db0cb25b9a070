/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use staffdir_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = staffdir_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use staffdir_shared::auth::jwt;
use staffdir_shared::directory::AccountDirectory;
use staffdir_shared::repo::postgres::PgAccountRepository;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ApiError;

/// Authenticated caller identity, injected by the JWT middleware
///
/// Handlers pull this from request extensions; the role string is the
/// one embedded in the validated token.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Account id from the token's `sub` claim
    pub account_id: Uuid,

    /// Resolved account role string
    pub role: String,
}

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Directory use cases over the Postgres repository
    pub directory: Arc<AccountDirectory<PgAccountRepository>>,

    /// Database connection pool (health checks)
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let directory = AccountDirectory::new(PgAccountRepository::new(db.clone()));
        Self {
            directory: Arc::new(directory),
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── /auth/
///     │   └── POST /login           # Login and get a token (public)
///     └── /accounts/                # Account directory (authenticated)
///         ├── GET    /              # List with filter/sort/pagination
///         ├── POST   /              # Create account
///         ├── GET    /:id           # Fetch account
///         ├── PUT    /:id           # Update account
///         ├── DELETE /:id           # Delete account
///         ├── POST   /import-csv    # Bulk import
///         └── GET    /export-csv    # Full export
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. Authentication (account routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    // Account directory routes (require JWT authentication)
    let account_routes = Router::new()
        .route(
            "/",
            get(routes::accounts::list_accounts).post(routes::accounts::create_account),
        )
        .route(
            "/:id",
            get(routes::accounts::get_account)
                .put(routes::accounts::update_account)
                .delete(routes::accounts::delete_account),
        )
        .route("/import-csv", post(routes::accounts::import_csv))
        .route("/export-csv", get(routes::accounts::export_csv))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/accounts", account_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization
/// header, then injects [`Caller`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(Caller {
        account_id: claims.sub,
        role: claims.account_role,
    });

    Ok(next.run(req).await)
}
