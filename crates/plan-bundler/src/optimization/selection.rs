use super::domain::{CoverageLevel, CoverageSummary, Recommendation, ScoredPlan};
use super::policy::{
    DEFAULT_RISK_PROTECTION, EXCELLENT_COVERAGE_AV, GOOD_COVERAGE_AV, MAX_ALTERNATIVES,
    NETWORK_STRENGTH_DISPLAY, RISK_PROTECTION_DIVISOR,
};
use crate::catalog::Plan;

/// Recommended plan and its runners-up for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub recommendation: Recommendation,
    pub alternatives: Vec<ScoredPlan>,
}

/// Orders plans by descending utility. Equal scores keep their catalog order.
pub fn rank(mut scored: Vec<ScoredPlan>) -> Vec<ScoredPlan> {
    // `sort_by` is stable
    scored.sort_by(|a, b| b.utility_score.total_cmp(&a.utility_score));
    scored
}

pub fn select(scored: Vec<ScoredPlan>) -> Selection {
    let mut ranked = rank(scored).into_iter();

    match ranked.next() {
        Some(top) => Selection {
            recommendation: Recommendation::Plan(top),
            alternatives: ranked.take(MAX_ALTERNATIVES).collect(),
        },
        None => Selection {
            recommendation: Recommendation::NoPlan,
            alternatives: Vec::new(),
        },
    }
}

pub fn coverage_level(actuarial_value: f64) -> CoverageLevel {
    if actuarial_value > EXCELLENT_COVERAGE_AV {
        CoverageLevel::Excellent
    } else if actuarial_value > GOOD_COVERAGE_AV {
        CoverageLevel::Good
    } else {
        CoverageLevel::Basic
    }
}

pub fn coverage_summary(plan: &Plan) -> CoverageSummary {
    let risk_protection = match plan.individual_moop() {
        Some(moop) => (10.0 - moop / RISK_PROTECTION_DIVISOR).max(0.0),
        None => DEFAULT_RISK_PROTECTION,
    };

    CoverageSummary {
        network_strength: NETWORK_STRENGTH_DISPLAY,
        coverage_level: coverage_level(plan.actuarial_value),
        risk_protection,
    }
}
