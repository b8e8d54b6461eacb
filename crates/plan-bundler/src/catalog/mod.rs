//! Read-only plan catalog snapshots and the provider seam the engine reads from.

mod parser;
pub mod plan;

pub use plan::{CostSharingLimit, MetalLevel, Plan, PlanType, UnknownVariant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const SAMPLE_CATALOG_CSV: &str = include_str!("../../data/sample_catalog.csv");

/// Error raised while loading or serving a catalog snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read plan catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid plan catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog line {line}: invalid {field} '{value}'")]
    InvalidRow {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("plan {plan_id} has invalid {field}")]
    InvalidPlan {
        plan_id: String,
        field: &'static str,
    },
    #[error("duplicate plan id {0}")]
    DuplicatePlan(String),
    #[error("plan catalog unavailable: {0}")]
    Unavailable(String),
}

/// Immutable view of the catalog shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub plans: Arc<[Plan]>,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn summary(&self) -> CatalogSummary {
        let mut states: Vec<String> = self
            .plans
            .iter()
            .map(|plan| plan.state_code.clone())
            .filter(|state| !state.is_empty())
            .collect();
        states.sort();
        states.dedup();

        CatalogSummary {
            plan_count: self.plans.len(),
            states,
            loaded_at: self.loaded_at,
        }
    }

    /// Plans sold in the given state, in catalog order.
    pub fn plans_for_state(&self, state_code: &str) -> Vec<Plan> {
        self.plans
            .iter()
            .filter(|plan| plan.state_code.eq_ignore_ascii_case(state_code.trim()))
            .cloned()
            .collect()
    }
}

/// Metadata describing a loaded snapshot for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub plan_count: usize,
    pub states: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Provider abstraction so the optimization service can be exercised in isolation.
pub trait PlanCatalog: Send + Sync {
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError>;
}

/// Catalog loaded once at startup and served from memory.
#[derive(Debug, Clone)]
pub struct InMemoryPlanCatalog {
    snapshot: CatalogSnapshot,
}

impl InMemoryPlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Result<Self, CatalogError> {
        validate_plans(&plans)?;
        Ok(Self {
            snapshot: CatalogSnapshot {
                plans: plans.into(),
                loaded_at: Utc::now(),
            },
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            plans = catalog.snapshot.plans.len(),
            "plan catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let plans = parser::parse_plans(reader)?;
        Self::new(plans)
    }

    /// Small FL/TX catalog shipped with the crate for demos and local runs.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_reader(SAMPLE_CATALOG_CSV.as_bytes())
    }

    pub fn plans(&self) -> &[Plan] {
        &self.snapshot.plans
    }
}

impl PlanCatalog for InMemoryPlanCatalog {
    fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(self.snapshot.clone())
    }
}

fn validate_plans(plans: &[Plan]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(plans.len());

    for plan in plans {
        if !seen.insert(plan.plan_id.as_str()) {
            return Err(CatalogError::DuplicatePlan(plan.plan_id.clone()));
        }

        let invalid = |field: &'static str| CatalogError::InvalidPlan {
            plan_id: plan.plan_id.clone(),
            field,
        };

        if !is_non_negative(plan.individual_rate) {
            return Err(invalid("individual_rate"));
        }
        if !(0.0..=100.0).contains(&plan.actuarial_value) {
            return Err(invalid("actuarial_value"));
        }

        let limits = [
            ("deductible", plan.deductible.individual),
            ("deductible", plan.deductible.family),
            ("moop", plan.moop.individual),
            ("moop", plan.moop.family),
        ];
        for (field, amount) in limits {
            if amount.map(|value| !is_non_negative(value)).unwrap_or(false) {
                return Err(invalid(field));
            }
        }
    }

    Ok(())
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "plan_id,plan_marketing_name,plan_type,metal_level,state_code,individual_rate,actuarial_value,is_hsa_eligible,deductible_individual,deductible_family,moop_individual,moop_family,network_id,service_area_id,covered_benefits,copays,coinsurance\n";

    fn csv(rows: &[&str]) -> Cursor<Vec<u8>> {
        let mut body = HEADER.to_string();
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        Cursor::new(body.into_bytes())
    }

    #[test]
    fn loads_rows_into_plans() {
        let catalog = InMemoryPlanCatalog::from_reader(csv(&[
            "16842FL0260006-02,BlueOptions Bronze,PPO,Bronze,fl,$312.40,60.8%,Yes,7500,15000,9200,18400,FLN001,FLS001,Primary Care;Generic Drugs,Primary Care=$0 virtual visit,Generic Drugs=20%",
            "21663FL0040012-01,Ambetter Silver,HMO,Silver,FL,401.00,70.1,No,,,,,FLN002,FLS002,,,",
        ]))
        .expect("catalog loads");

        let plans = catalog.plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].plan_type, PlanType::Ppo);
        assert_eq!(plans[0].state_code, "FL");
        assert_eq!(plans[0].individual_rate, 312.40);
        assert_eq!(plans[0].actuarial_value, 60.8);
        assert!(plans[0].hsa_eligible);
        assert_eq!(plans[0].individual_moop(), Some(9200.0));
        assert!(plans[0].covers("Generic Drugs"));
        assert_eq!(plans[0].copays["Primary Care"], "$0 virtual visit");

        assert!(!plans[1].hsa_eligible);
        assert_eq!(plans[1].individual_deductible(), None);
        assert!(plans[1].covered_benefits.is_empty());
    }

    #[test]
    fn rejects_duplicate_plan_ids() {
        let err = InMemoryPlanCatalog::from_reader(csv(&[
            "A,First,PPO,Low,TX,10,70,No,,,,,N,S,,,",
            "A,Second,PPO,Low,TX,12,70,No,,,,,N,S,,,",
        ]))
        .expect_err("duplicate id rejected");

        assert!(matches!(err, CatalogError::DuplicatePlan(id) if id == "A"));
    }

    #[test]
    fn reports_line_of_unparseable_cell() {
        let err = InMemoryPlanCatalog::from_reader(csv(&[
            "A,First,PPO,Low,TX,10,70,No,,,,,N,S,,,",
            "B,Second,Indemnity,Low,TX,12,70,No,,,,,N,S,,,",
        ]))
        .expect_err("unknown plan type rejected");

        match err {
            CatalogError::InvalidRow { line, field, value } => {
                assert_eq!(line, 3);
                assert_eq!(field, "plan_type");
                assert_eq!(value, "Indemnity");
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn rejects_actuarial_value_outside_percentage_range() {
        let err =
            InMemoryPlanCatalog::from_reader(csv(&["B,Second,PPO,Low,TX,10,170,No,,,,,N,S,,,"]))
                .expect_err("out of range AV rejected");

        assert!(matches!(
            err,
            CatalogError::InvalidPlan { field: "actuarial_value", .. }
        ));
    }

    #[test]
    fn snapshot_filters_plans_by_state() {
        let catalog = InMemoryPlanCatalog::from_reader(csv(&[
            "A,First,PPO,Low,TX,10,70,No,,,,,N,S,,,",
            "B,Second,HMO,High,FL,12,80,No,,,,,N,S,,,",
            "C,Third,EPO,High,tx,14,82,No,,,,,N,S,,,",
        ]))
        .expect("catalog loads");

        let snapshot = catalog.snapshot().expect("snapshot available");
        let texas: Vec<String> = snapshot
            .plans_for_state("tx")
            .into_iter()
            .map(|plan| plan.plan_id)
            .collect();
        assert_eq!(texas, vec!["A".to_string(), "C".to_string()]);

        let summary = snapshot.summary();
        assert_eq!(summary.plan_count, 3);
        assert_eq!(summary.states, vec!["FL".to_string(), "TX".to_string()]);
    }

    #[test]
    fn bundled_sample_loads() {
        let catalog = InMemoryPlanCatalog::sample().expect("sample catalog parses");

        assert_eq!(catalog.plans().len(), 10);
        let scenario = &catalog.plans()[0];
        assert_eq!(scenario.plan_id, "16842FL0260006-02");
        assert_eq!(scenario.deductible.individual, None);
        assert_eq!(scenario.moop.individual, Some(700.0));
        assert_eq!(
            catalog.snapshot().expect("snapshot").summary().states,
            vec!["FL".to_string(), "TX".to_string()]
        );
    }
}
