use super::domain::{Bundle, CostBreakdown, EmployeeGroupProfile, Recommendation};
use super::policy::MONTHS_PER_YEAR;

/// Employer funds the premium up to the cap; the employee pays any excess.
pub fn cost_breakdown(recommendation: &Recommendation, budget_cap: f64) -> CostBreakdown {
    let Some(scored) = recommendation.plan() else {
        return CostBreakdown::default();
    };

    let monthly_premium = scored.plan.individual_rate;
    CostBreakdown {
        monthly_premium,
        annual_cost: monthly_premium * MONTHS_PER_YEAR,
        employer_contribution: budget_cap.min(monthly_premium) * MONTHS_PER_YEAR,
        employee_contribution: (monthly_premium - budget_cap).max(0.0) * MONTHS_PER_YEAR,
    }
}

/// Employer spend across the workforce. Bundles and groups pair up by position.
pub fn total_employer_cost(bundles: &[Bundle], groups: &[EmployeeGroupProfile]) -> f64 {
    bundles
        .iter()
        .zip(groups)
        .map(|(bundle, group)| bundle.cost.employer_contribution * f64::from(group.headcount))
        .sum()
}
