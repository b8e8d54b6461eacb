use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Network arrangement of a marketplace plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanType {
    Ppo,
    Hmo,
    Epo,
    Pos,
}

impl PlanType {
    pub fn label(self) -> &'static str {
        match self {
            PlanType::Ppo => "PPO",
            PlanType::Hmo => "HMO",
            PlanType::Epo => "EPO",
            PlanType::Pos => "POS",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PPO" => Ok(PlanType::Ppo),
            "HMO" => Ok(PlanType::Hmo),
            "EPO" => Ok(PlanType::Epo),
            "POS" => Ok(PlanType::Pos),
            _ => Err(UnknownVariant {
                kind: "plan type",
                value: value.to_string(),
            }),
        }
    }
}

/// Marketplace coverage tier. Summary catalogs collapse tiers to `Low`/`High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MetalLevel {
    Low,
    High,
    Catastrophic,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MetalLevel {
    pub fn label(self) -> &'static str {
        match self {
            MetalLevel::Low => "Low",
            MetalLevel::High => "High",
            MetalLevel::Catastrophic => "Catastrophic",
            MetalLevel::Bronze => "Bronze",
            MetalLevel::Silver => "Silver",
            MetalLevel::Gold => "Gold",
            MetalLevel::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for MetalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetalLevel {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(MetalLevel::Low),
            "high" => Ok(MetalLevel::High),
            "catastrophic" => Ok(MetalLevel::Catastrophic),
            "bronze" | "expanded bronze" => Ok(MetalLevel::Bronze),
            "silver" => Ok(MetalLevel::Silver),
            "gold" => Ok(MetalLevel::Gold),
            "platinum" => Ok(MetalLevel::Platinum),
            _ => Err(UnknownVariant {
                kind: "metal level",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Individual and family amounts for a cost-sharing limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSharingLimit {
    pub individual: Option<f64>,
    pub family: Option<f64>,
}

/// Immutable marketplace plan as published in the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub marketing_name: String,
    pub plan_type: PlanType,
    pub metal_level: MetalLevel,
    pub state_code: String,
    /// Monthly premium for a single subscriber.
    pub individual_rate: f64,
    /// Percentage in `0..=100`.
    pub actuarial_value: f64,
    pub hsa_eligible: bool,
    #[serde(default)]
    pub deductible: CostSharingLimit,
    #[serde(default)]
    pub moop: CostSharingLimit,
    pub network_id: String,
    pub service_area_id: String,
    #[serde(default)]
    pub covered_benefits: BTreeSet<String>,
    #[serde(default)]
    pub copays: BTreeMap<String, String>,
    #[serde(default)]
    pub coinsurance: BTreeMap<String, String>,
}

impl Plan {
    pub fn individual_deductible(&self) -> Option<f64> {
        self.deductible.individual
    }

    pub fn individual_moop(&self) -> Option<f64> {
        self.moop.individual
    }

    pub fn covers(&self, benefit: &str) -> bool {
        self.covered_benefits.contains(benefit)
    }
}
