//! Application-specific readiness handler backed by a real store read.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_inventory::InventoryRepository;

/// Readiness check endpoint that reads through the in-memory store.
///
/// This uses the generic `run_health_checks` utility from axum-helpers so the
/// response shape matches every other service.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            state
                .inventory
                .list_all()
                .await
                .map(|_| ())
                .map_err(|e| format!("Store read failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
