//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};
use serde_json::Value;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        if database::mongodb::check_health(&state.db).await {
            Ok(())
        } else {
            Err("ping failed".to_string())
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

/// Router exposing `GET /ready`
pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
