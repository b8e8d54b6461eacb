use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{MetalLevel, Plan, PlanType};

/// Tobacco rating preference declared for a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TobaccoPreference {
    #[default]
    NoPreference,
    Tobacco,
    NonTobacco,
}

/// Demographic slice of the workforce that receives one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeGroupProfile {
    pub label: String,
    pub headcount: u32,
    /// Age indicator such as `"25-34"`.
    pub age_range: String,
    /// Monthly amount the employer will fund per employee.
    pub budget_cap: f64,
    pub state_code: String,
    #[serde(default)]
    pub tobacco_preference: TobaccoPreference,
}

/// Hard eligibility rules shared by every group in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub max_monthly_premium: f64,
    /// Percentage in `0..=100`.
    pub min_actuarial_value: f64,
    pub preferred_metal_level: MetalLevel,
    pub preferred_plan_type: PlanType,
    #[serde(default)]
    pub max_deductible: Option<f64>,
    #[serde(default)]
    pub hsa_only: bool,
    #[serde(default)]
    pub required_benefits: BTreeSet<String>,
}

/// Catalog plan paired with the utility it earned for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlan {
    #[serde(flatten)]
    pub plan: Plan,
    pub utility_score: f64,
}

/// Outcome of plan selection for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Plan(ScoredPlan),
    /// No catalog plan satisfied the constraints.
    NoPlan,
}

impl Recommendation {
    pub fn plan(&self) -> Option<&ScoredPlan> {
        match self {
            Recommendation::Plan(scored) => Some(scored),
            Recommendation::NoPlan => None,
        }
    }

    pub fn is_no_plan(&self) -> bool {
        matches!(self, Recommendation::NoPlan)
    }
}

/// Per-employee cost split. All annual figures are premium times twelve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub monthly_premium: f64,
    pub annual_cost: f64,
    pub employer_contribution: f64,
    pub employee_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLevel {
    Excellent,
    Good,
    Basic,
}

impl CoverageLevel {
    pub fn label(self) -> &'static str {
        match self {
            CoverageLevel::Excellent => "Excellent",
            CoverageLevel::Good => "Good",
            CoverageLevel::Basic => "Basic",
        }
    }
}

/// Display-oriented summary of the recommended plan's coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub network_strength: f64,
    pub coverage_level: CoverageLevel,
    pub risk_protection: f64,
}

/// Recommendation, runners-up and cost roll-up for one employee group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub group_label: String,
    pub recommendation: Recommendation,
    pub alternatives: Vec<ScoredPlan>,
    pub cost: CostBreakdown,
    pub coverage: Option<CoverageSummary>,
    pub eligible_plan_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Optimal,
    /// Reserved; ranking a filtered set never produces it.
    Suboptimal,
    Infeasible,
}

impl OptimizationStatus {
    pub fn label(self) -> &'static str {
        match self {
            OptimizationStatus::Optimal => "optimal",
            OptimizationStatus::Suboptimal => "suboptimal",
            OptimizationStatus::Infeasible => "infeasible",
        }
    }
}

/// Terminal output of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub bundles: Vec<Bundle>,
    pub total_cost: f64,
    pub status: OptimizationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
