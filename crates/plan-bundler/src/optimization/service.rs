use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{OptimizationResult, OptimizationStatus};
use super::{optimize, OptimizationError, OptimizationRequest};
use crate::catalog::{CatalogSnapshot, PlanCatalog};

/// Service composing a catalog provider with the selection engine.
pub struct OptimizationService<C> {
    catalog: Arc<C>,
}

impl<C> OptimizationService<C>
where
    C: PlanCatalog + 'static,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    /// Run one optimization against the current catalog snapshot.
    ///
    /// The snapshot is taken before any group is processed, so an unavailable catalog
    /// fails the whole run.
    pub fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, OptimizationError> {
        let snapshot = self.catalog.snapshot().map_err(|err| {
            warn!(error = %err, "plan catalog unavailable");
            OptimizationError::CatalogUnavailable(err)
        })?;

        let result = optimize(&request.groups, &request.constraints, &snapshot.plans)?;

        match result.status {
            OptimizationStatus::Infeasible => warn!(
                groups = request.groups.len(),
                catalog = snapshot.plans.len(),
                message = result.message.as_deref().unwrap_or_default(),
                "optimization infeasible"
            ),
            status => info!(
                groups = request.groups.len(),
                status = status.label(),
                total_cost = result.total_cost,
                "optimization completed"
            ),
        }

        Ok(result)
    }

    pub fn snapshot(&self) -> Result<CatalogSnapshot, OptimizationError> {
        Ok(self.catalog.snapshot()?)
    }
}
