use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::ConstraintSet;
use crate::catalog::Plan;

/// First hard rule a plan failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    PremiumAboveCap,
    ActuarialValueBelowMinimum,
    MetalLevelMismatch,
    PlanTypeMismatch,
    DeductibleAboveMaximum,
    NotHsaEligible,
    MissingRequiredBenefit,
}

impl ExclusionReason {
    pub fn label(self) -> &'static str {
        match self {
            ExclusionReason::PremiumAboveCap => "premium above maximum",
            ExclusionReason::ActuarialValueBelowMinimum => "actuarial value below minimum",
            ExclusionReason::MetalLevelMismatch => "metal level mismatch",
            ExclusionReason::PlanTypeMismatch => "plan type mismatch",
            ExclusionReason::DeductibleAboveMaximum => "deductible above maximum",
            ExclusionReason::NotHsaEligible => "not HSA eligible",
            ExclusionReason::MissingRequiredBenefit => "missing required benefit",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the first rule `plan` violates, or `None` when it is eligible.
pub fn check_plan(plan: &Plan, constraints: &ConstraintSet) -> Option<ExclusionReason> {
    // unpriced or unrated plans fail closed
    if !plan.individual_rate.is_finite()
        || plan.individual_rate > constraints.max_monthly_premium
    {
        return Some(ExclusionReason::PremiumAboveCap);
    }

    if !plan.actuarial_value.is_finite()
        || plan.actuarial_value < constraints.min_actuarial_value
    {
        return Some(ExclusionReason::ActuarialValueBelowMinimum);
    }

    if plan.metal_level != constraints.preferred_metal_level {
        return Some(ExclusionReason::MetalLevelMismatch);
    }

    if plan.plan_type != constraints.preferred_plan_type {
        return Some(ExclusionReason::PlanTypeMismatch);
    }

    // a plan without a published deductible is never excluded here
    if let (Some(max), Some(deductible)) =
        (constraints.max_deductible, plan.individual_deductible())
    {
        if !deductible.is_finite() || deductible > max {
            return Some(ExclusionReason::DeductibleAboveMaximum);
        }
    }

    if constraints.hsa_only && !plan.hsa_eligible {
        return Some(ExclusionReason::NotHsaEligible);
    }

    if !constraints
        .required_benefits
        .iter()
        .all(|benefit| plan.covers(benefit))
    {
        return Some(ExclusionReason::MissingRequiredBenefit);
    }

    None
}

/// Eligible plans in catalog order plus counts of why the rest were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityReport<'a> {
    pub eligible: Vec<&'a Plan>,
    pub exclusions: BTreeMap<ExclusionReason, usize>,
}

impl EligibilityReport<'_> {
    pub fn excluded_count(&self) -> usize {
        self.exclusions.values().sum()
    }

    /// Human readable tally such as `premium above maximum: 3, plan type mismatch: 1`.
    pub fn exclusion_summary(&self) -> String {
        self.exclusions
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn filter_eligible<'a>(
    catalog: &'a [Plan],
    constraints: &ConstraintSet,
) -> EligibilityReport<'a> {
    let mut eligible = Vec::new();
    let mut exclusions = BTreeMap::new();

    for plan in catalog {
        match check_plan(plan, constraints) {
            None => eligible.push(plan),
            Some(reason) => *exclusions.entry(reason).or_insert(0) += 1,
        }
    }

    EligibilityReport {
        eligible,
        exclusions,
    }
}
