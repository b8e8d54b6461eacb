use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::catalog::{CatalogError, CatalogSnapshot, InMemoryPlanCatalog, PlanCatalog};
use crate::optimization::domain::OptimizationStatus;
use crate::optimization::{
    optimization_router, OptimizationError, OptimizationRequest, OptimizationService,
};

struct OfflineCatalog;

impl PlanCatalog for OfflineCatalog {
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        Err(CatalogError::Unavailable("marketplace feed offline".to_string()))
    }
}

fn catalog_service() -> Arc<OptimizationService<InMemoryPlanCatalog>> {
    let mut texas = plan("TX-PPO-1", 210.0, 78.0);
    texas.state_code = "TX".to_string();
    let catalog = InMemoryPlanCatalog::new(vec![
        scenario_plan(),
        plan("FL-PPO-2", 95.0, 81.0),
        texas,
    ])
    .expect("catalog valid");
    Arc::new(OptimizationService::new(Arc::new(catalog)))
}

fn request() -> OptimizationRequest {
    OptimizationRequest {
        groups: vec![group("Engineers", 10, 400.0), group("Support", 5, 150.0)],
        constraints: constraints(500.0, 60.0),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[test]
fn service_runs_against_catalog_snapshot() {
    let service = catalog_service();

    let result = service.optimize(&request()).expect("optimization runs");

    assert_eq!(result.status, OptimizationStatus::Optimal);
    assert_eq!(result.bundles.len(), 2);
    assert!(result.bundles.iter().all(|bundle| bundle.eligible_plan_count == 3));
}

#[test]
fn unavailable_catalog_fails_before_processing() {
    let service = OptimizationService::new(Arc::new(OfflineCatalog));

    let err = service.optimize(&request()).expect_err("catalog outage surfaces");

    assert!(matches!(err, OptimizationError::CatalogUnavailable(_)));
    assert!(!err.is_invalid_input());
    assert!(err.to_string().contains("marketplace feed offline"));
}

#[tokio::test]
async fn optimize_route_returns_result_envelope() {
    let app = optimization_router(catalog_service());
    let body = serde_json::to_vec(&request()).expect("serialize request");

    let response = app
        .oneshot(
            Request::post("/api/v1/optimize")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["result"]["status"], "optimal");
    assert_eq!(payload["result"]["bundles"][0]["group_label"], "Engineers");
    assert_eq!(
        payload["result"]["bundles"][0]["recommendation"]["kind"],
        "plan"
    );
    assert!(payload["optimization_time_ms"].as_f64().is_some());
}

#[tokio::test]
async fn optimize_route_rejects_invalid_headcount() {
    let app = optimization_router(catalog_service());
    let mut invalid = request();
    invalid.groups[1].headcount = 0;

    let response = app
        .oneshot(
            Request::post("/api/v1/optimize")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&invalid).expect("serialize")))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = body_json(response).await;
    assert_eq!(
        payload,
        json!({ "error": "group 'Support' must have a positive headcount" })
    );
}

#[tokio::test]
async fn optimize_route_reports_catalog_outage() {
    let app = optimization_router(Arc::new(OptimizationService::new(Arc::new(OfflineCatalog))));

    let response = app
        .oneshot(
            Request::post("/api/v1/optimize")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&request()).expect("serialize")))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn plans_route_filters_by_state() {
    let app = optimization_router(catalog_service());

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/v1/plans/tx")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    let plans = payload.as_array().expect("plan list");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["plan_id"], "TX-PPO-1");

    let missing = app
        .oneshot(
            Request::get("/api/v1/plans/AK")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_route_summarizes_snapshot() {
    let app = optimization_router(catalog_service());

    let response = app
        .oneshot(
            Request::get("/api/v1/catalog")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["plan_count"], 3);
    assert_eq!(payload["states"], json!(["FL", "TX"]));
}
