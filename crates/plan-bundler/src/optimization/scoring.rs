use serde::{Deserialize, Serialize};

use super::domain::{EmployeeGroupProfile, ScoredPlan};
use super::policy::{
    AFFORDABILITY_WEIGHT, COVERAGE_WEIGHT, MOOP_NORMALIZATION, NETWORK_QUALITY, NETWORK_WEIGHT,
    NEUTRAL_PROTECTION, PROTECTION_WEIGHT, UTILITY_SCALE,
};
use crate::catalog::Plan;

/// Unit-interval components behind a utility score, kept for audits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityBreakdown {
    pub affordability: f64,
    pub protection: f64,
    pub coverage: f64,
    pub network: f64,
    /// Weighted sum scaled to `0..=10`.
    pub total: f64,
}

pub fn utility_breakdown(plan: &Plan, profile: &EmployeeGroupProfile) -> UtilityBreakdown {
    let affordability = affordability(plan.individual_rate, profile.budget_cap);
    let protection = match plan.individual_moop() {
        Some(moop) => unit(1.0 - moop / MOOP_NORMALIZATION),
        None => NEUTRAL_PROTECTION,
    };
    let coverage = unit(plan.actuarial_value / 100.0);
    let network = NETWORK_QUALITY;

    let weighted = affordability * AFFORDABILITY_WEIGHT
        + protection * PROTECTION_WEIGHT
        + coverage * COVERAGE_WEIGHT
        + network * NETWORK_WEIGHT;

    UtilityBreakdown {
        affordability,
        protection,
        coverage,
        network,
        total: clamp_finite(weighted * UTILITY_SCALE, 0.0, UTILITY_SCALE),
    }
}

pub fn utility_score(plan: &Plan, profile: &EmployeeGroupProfile) -> f64 {
    utility_breakdown(plan, profile).total
}

pub fn score_plans(plans: &[&Plan], profile: &EmployeeGroupProfile) -> Vec<ScoredPlan> {
    plans
        .iter()
        .map(|plan| ScoredPlan {
            plan: (*plan).clone(),
            utility_score: utility_score(plan, profile),
        })
        .collect()
}

/// A non-positive cap leaves the ratio undefined, which scores as unaffordable.
fn affordability(rate: f64, budget_cap: f64) -> f64 {
    if budget_cap.is_nan() || budget_cap <= 0.0 {
        return 0.0;
    }
    unit(1.0 - rate / budget_cap)
}

fn unit(value: f64) -> f64 {
    clamp_finite(value, 0.0, 1.0)
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}
