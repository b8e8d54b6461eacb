use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{CostSharingLimit, MetalLevel, Plan, PlanType};
use crate::optimization::domain::{ConstraintSet, EmployeeGroupProfile, TobaccoPreference};

pub(super) fn plan(plan_id: &str, rate: f64, actuarial_value: f64) -> Plan {
    Plan {
        plan_id: plan_id.to_string(),
        marketing_name: format!("{plan_id} Marketplace PPO"),
        plan_type: PlanType::Ppo,
        metal_level: MetalLevel::Low,
        state_code: "FL".to_string(),
        individual_rate: rate,
        actuarial_value,
        hsa_eligible: false,
        deductible: CostSharingLimit::default(),
        moop: CostSharingLimit {
            individual: Some(700.0),
            family: Some(1400.0),
        },
        network_id: "FLN001".to_string(),
        service_area_id: "FLS001".to_string(),
        covered_benefits: BTreeSet::from([
            "Primary Care Visit".to_string(),
            "Generic Drugs".to_string(),
        ]),
        copays: BTreeMap::from([("Primary Care Visit".to_string(), "$25".to_string())]),
        coinsurance: BTreeMap::new(),
    }
}

/// The single-plan catalog used by the acceptance scenarios.
pub(super) fn scenario_plan() -> Plan {
    plan("16842FL0260006-02", 32.0, 69.9)
}

pub(super) fn group(label: &str, headcount: u32, budget_cap: f64) -> EmployeeGroupProfile {
    EmployeeGroupProfile {
        label: label.to_string(),
        headcount,
        age_range: "25-34".to_string(),
        budget_cap,
        state_code: "FL".to_string(),
        tobacco_preference: TobaccoPreference::NonTobacco,
    }
}

pub(super) fn constraints(max_premium: f64, min_av: f64) -> ConstraintSet {
    ConstraintSet {
        max_monthly_premium: max_premium,
        min_actuarial_value: min_av,
        preferred_metal_level: MetalLevel::Low,
        preferred_plan_type: PlanType::Ppo,
        max_deductible: None,
        hsa_only: false,
        required_benefits: BTreeSet::new(),
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
