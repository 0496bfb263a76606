use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: bool,
    pub app: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
    pub timestamp: String,
}

#[instrument(skip(state))]
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    // App is running if we got this far.
    let checks = HealthChecks {
        database,
        app: true,
    };
    let healthy = checks.database && checks.app;

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        checks,
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_expected_fields() {
        let body = HealthResponse {
            status: "healthy",
            checks: HealthChecks {
                database: true,
                app: true,
            },
            timestamp: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"database\":true"));
        assert!(json.contains("timestamp"));
    }
}
