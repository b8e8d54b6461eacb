//! Plan selection: eligibility filtering, utility scoring, ranking and cost roll-up.
//!
//! A run is synchronous and stateless. It reads a catalog slice, never mutates it, and
//! returns one terminal [`OptimizationResult`].

pub mod cost;
pub mod domain;
pub mod eligibility;
pub mod policy;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Bundle, ConstraintSet, CostBreakdown, CoverageLevel, CoverageSummary, EmployeeGroupProfile,
    OptimizationResult, OptimizationStatus, Recommendation, ScoredPlan, TobaccoPreference,
};
pub use eligibility::{EligibilityReport, ExclusionReason};
pub use router::optimization_router;
pub use scoring::UtilityBreakdown;
pub use service::OptimizationService;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Plan;

/// Groups and shared constraints submitted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub groups: Vec<EmployeeGroupProfile>,
    pub constraints: ConstraintSet,
}

/// Error raised before a run starts. "No eligible plan" is a result, not an error.
#[derive(Debug, thiserror::Error)]
pub enum OptimizationError {
    #[error("at least one employee group is required")]
    EmptyGroups,
    #[error("group '{group}' must have a positive headcount")]
    InvalidHeadcount { group: String },
    #[error("group '{group}' budget cap must be a non-negative amount (found {value})")]
    InvalidBudgetCap { group: String, value: f64 },
    #[error("constraint {field} is invalid: {detail}")]
    InvalidConstraint {
        field: &'static str,
        detail: String,
    },
    #[error(transparent)]
    CatalogUnavailable(#[from] crate::catalog::CatalogError),
}

impl OptimizationError {
    /// True for failures caused by the request rather than the catalog.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, OptimizationError::CatalogUnavailable(_))
    }
}

/// Recommends a plan for each group and rolls up employer cost.
pub fn optimize(
    groups: &[EmployeeGroupProfile],
    constraints: &ConstraintSet,
    catalog: &[Plan],
) -> Result<OptimizationResult, OptimizationError> {
    validate_groups(groups)?;
    validate_constraints(constraints)?;

    // eligibility depends only on the shared constraints
    let report = eligibility::filter_eligible(catalog, constraints);
    debug!(
        catalog = catalog.len(),
        eligible = report.eligible.len(),
        excluded = report.excluded_count(),
        "eligibility filter applied"
    );

    let bundles: Vec<Bundle> = groups
        .iter()
        .map(|group| build_bundle(group, &report))
        .collect();

    let total_cost = cost::total_employer_cost(&bundles, groups);
    let (status, message) = summarize(&report, catalog.len());

    Ok(OptimizationResult {
        bundles,
        total_cost,
        status,
        message,
    })
}

fn build_bundle(group: &EmployeeGroupProfile, report: &EligibilityReport<'_>) -> Bundle {
    let scored = scoring::score_plans(&report.eligible, group);
    let picked = selection::select(scored);
    let breakdown = cost::cost_breakdown(&picked.recommendation, group.budget_cap);
    let coverage = picked
        .recommendation
        .plan()
        .map(|scored| selection::coverage_summary(&scored.plan));

    debug!(
        group = %group.label,
        recommended = picked.recommendation.plan().map(|s| s.plan.plan_id.as_str()),
        alternatives = picked.alternatives.len(),
        employer_contribution = breakdown.employer_contribution,
        "bundle selected"
    );

    Bundle {
        group_label: group.label.clone(),
        recommendation: picked.recommendation,
        alternatives: picked.alternatives,
        cost: breakdown,
        coverage,
        eligible_plan_count: report.eligible.len(),
    }
}

/// Groups share one constraint set, so they either all have a plan or none do.
fn summarize(
    report: &EligibilityReport<'_>,
    catalog_len: usize,
) -> (OptimizationStatus, Option<String>) {
    if !report.eligible.is_empty() {
        return (OptimizationStatus::Optimal, None);
    }

    let detail = if catalog_len == 0 {
        "the plan catalog is empty".to_string()
    } else {
        format!(
            "all {} catalog plans excluded ({})",
            catalog_len,
            report.exclusion_summary()
        )
    };

    (
        OptimizationStatus::Infeasible,
        Some(format!(
            "no plan satisfies the constraints for any employee group: {detail}"
        )),
    )
}

fn validate_groups(groups: &[EmployeeGroupProfile]) -> Result<(), OptimizationError> {
    if groups.is_empty() {
        return Err(OptimizationError::EmptyGroups);
    }

    for group in groups {
        if group.headcount == 0 {
            return Err(OptimizationError::InvalidHeadcount {
                group: group.label.clone(),
            });
        }
        if !is_amount(group.budget_cap) {
            return Err(OptimizationError::InvalidBudgetCap {
                group: group.label.clone(),
                value: group.budget_cap,
            });
        }
    }

    Ok(())
}

fn validate_constraints(constraints: &ConstraintSet) -> Result<(), OptimizationError> {
    if !is_amount(constraints.max_monthly_premium) {
        return Err(OptimizationError::InvalidConstraint {
            field: "max_monthly_premium",
            detail: format!(
                "expected a non-negative amount, found {}",
                constraints.max_monthly_premium
            ),
        });
    }

    if !(0.0..=100.0).contains(&constraints.min_actuarial_value) {
        return Err(OptimizationError::InvalidConstraint {
            field: "min_actuarial_value",
            detail: format!(
                "expected a percentage between 0 and 100, found {}",
                constraints.min_actuarial_value
            ),
        });
    }

    if let Some(max_deductible) = constraints.max_deductible {
        if !is_amount(max_deductible) {
            return Err(OptimizationError::InvalidConstraint {
                field: "max_deductible",
                detail: format!("expected a non-negative amount, found {max_deductible}"),
            });
        }
    }

    if constraints
        .required_benefits
        .iter()
        .any(|benefit| benefit.trim().is_empty())
    {
        return Err(OptimizationError::InvalidConstraint {
            field: "required_benefits",
            detail: "benefit names must not be blank".to_string(),
        });
    }

    Ok(())
}

fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
