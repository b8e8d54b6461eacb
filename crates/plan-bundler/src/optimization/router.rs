use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::OptimizationResult;
use super::service::OptimizationService;
use super::{OptimizationError, OptimizationRequest};
use crate::catalog::PlanCatalog;

/// Response envelope adding wall-clock timing to the deterministic result.
#[derive(Debug, Serialize)]
pub struct OptimizationResponse {
    pub result: OptimizationResult,
    pub optimization_time_ms: f64,
}

/// Router builder exposing optimization and catalog lookup endpoints.
pub fn optimization_router<C>(service: Arc<OptimizationService<C>>) -> Router
where
    C: PlanCatalog + 'static,
{
    Router::new()
        .route("/api/v1/optimize", post(optimize_handler::<C>))
        .route("/api/v1/plans/:state_code", get(plans_handler::<C>))
        .route("/api/v1/catalog", get(catalog_handler::<C>))
        .with_state(service)
}

pub(crate) async fn optimize_handler<C>(
    State(service): State<Arc<OptimizationService<C>>>,
    Json(request): Json<OptimizationRequest>,
) -> Response
where
    C: PlanCatalog + 'static,
{
    let started = Instant::now();
    match service.optimize(&request) {
        Ok(result) => {
            let body = OptimizationResponse {
                result,
                optimization_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn plans_handler<C>(
    State(service): State<Arc<OptimizationService<C>>>,
    Path(state_code): Path<String>,
) -> Response
where
    C: PlanCatalog + 'static,
{
    match service.snapshot() {
        Ok(snapshot) => {
            let plans = snapshot.plans_for_state(&state_code);
            if plans.is_empty() {
                let state = state_code.to_ascii_uppercase();
                let payload = json!({
                    "error": format!("no plans found for state {state}"),
                });
                (StatusCode::NOT_FOUND, Json(payload)).into_response()
            } else {
                (StatusCode::OK, Json(plans)).into_response()
            }
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn catalog_handler<C>(
    State(service): State<Arc<OptimizationService<C>>>,
) -> Response
where
    C: PlanCatalog + 'static,
{
    match service.snapshot() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot.summary())).into_response(),
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &OptimizationError) -> Response {
    let status = match error {
        OptimizationError::EmptyGroups => StatusCode::BAD_REQUEST,
        OptimizationError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
