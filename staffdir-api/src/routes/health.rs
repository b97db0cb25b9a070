/// Liveness endpoint
///
/// Public by design: load balancers and uptime probes hit it without
/// credentials. Reports the package version and whether the database
/// currently answers a trivial query. A broken database degrades the
/// status but never turns the probe itself into an error response.
use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

/// `GET /health` response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_ok = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();
    Json(summarize(db_ok))
}

fn summarize(db_ok: bool) -> HealthResponse {
    HealthResponse {
        status: if db_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if db_ok { "connected" } else { "disconnected" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tracks_database_reachability() {
        let healthy = summarize(true);
        assert_eq!(healthy.status, "healthy");
        assert_eq!(healthy.database, "connected");

        let degraded = summarize(false);
        assert_eq!(degraded.status, "degraded");
        assert_eq!(degraded.database, "disconnected");
        assert!(!degraded.version.is_empty());
    }
}
