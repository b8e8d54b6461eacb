use metrics_exporter_prometheus::PrometheusHandle;
use plan_bundler::catalog::{CatalogError, InMemoryPlanCatalog};
use plan_bundler::config::CatalogConfig;
use plan_bundler::error::AppError;
use plan_bundler::optimization::OptimizationRequest;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured catalog file, falling back to the bundled sample.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<InMemoryPlanCatalog, CatalogError> {
    match &config.path {
        Some(path) => InMemoryPlanCatalog::from_path(path),
        None => {
            let catalog = InMemoryPlanCatalog::sample()?;
            info!(plans = catalog.plans().len(), "serving bundled sample catalog");
            Ok(catalog)
        }
    }
}

pub(crate) fn read_request(path: &Path) -> Result<OptimizationRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
